//! Sparse keyed tables.
//!
//! A [`Table`] maps a row key to a set of column values. An absent cell is a
//! missing value: aggregation skips it, and stages that need a complete row
//! drop the row. Ordered maps keep every iteration deterministic, which makes
//! repeated pipeline runs produce identical output.

use crate::error::{BiogasError, BiogasResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// What to do when a mapping references a column absent from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSources {
    /// Absent source column is a [`BiogasError::MissingSourceColumn`].
    #[default]
    Fail,
    /// Absent source columns are skipped.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table<R: Ord, C: Ord> {
    rows: BTreeMap<R, BTreeMap<C, f64>>,
}

impl<R: Ord, C: Ord> Default for Table<R, C> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Ord + Clone, C: Ord + Clone> Table<R, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: BTreeMap<R, BTreeMap<C, f64>>) -> Self {
        Self { rows }
    }

    pub fn insert(&mut self, row: R, column: C, value: f64) {
        self.rows.entry(row).or_default().insert(column, value);
    }

    pub fn get(&self, row: &R, column: &C) -> Option<f64> {
        self.rows.get(row).and_then(|cols| cols.get(column)).copied()
    }

    pub fn row(&self, row: &R) -> Option<&BTreeMap<C, f64>> {
        self.rows.get(row)
    }

    pub fn contains_row(&self, row: &R) -> bool {
        self.rows.contains_key(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&R, &BTreeMap<C, f64>)> {
        self.rows.iter()
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &R> {
        self.rows.keys()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&R, &C, f64)> {
        self.rows
            .iter()
            .flat_map(|(r, cols)| cols.iter().map(move |(c, v)| (r, c, *v)))
    }

    /// Every column that has a value in at least one row.
    pub fn columns(&self) -> BTreeSet<C> {
        self.rows
            .values()
            .flat_map(|cols| cols.keys().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&R, &BTreeMap<C, f64>) -> bool,
    {
        self.rows.retain(|r, cols| keep(r, cols));
    }

    pub fn into_rows(self) -> BTreeMap<R, BTreeMap<C, f64>> {
        self.rows
    }

    pub fn transpose(&self) -> Table<C, R> {
        self.cells()
            .map(|(r, c, v)| (c.clone(), r.clone(), v))
            .collect()
    }

    /// Sum groups of source columns into new columns.
    ///
    /// A target cell is missing when none of its sources has a value in that
    /// row.
    pub fn aggregate<T>(
        &self,
        mapping: &BTreeMap<T, Vec<C>>,
        missing: MissingSources,
    ) -> BiogasResult<Table<R, T>>
    where
        T: Ord + Clone,
        C: Display,
    {
        let available = self.columns();
        let mut resolved: Vec<(&T, Vec<&C>)> = Vec::with_capacity(mapping.len());
        for (target, sources) in mapping {
            let mut kept = Vec::with_capacity(sources.len());
            for source in sources {
                if available.contains(source) {
                    kept.push(source);
                } else if missing == MissingSources::Fail {
                    return Err(BiogasError::MissingSourceColumn(source.to_string()));
                }
            }
            resolved.push((target, kept));
        }

        let mut result = Table::new();
        for (row, cols) in &self.rows {
            for (target, sources) in &resolved {
                let mut values = sources.iter().filter_map(|s| cols.get(*s)).peekable();
                if values.peek().is_some() {
                    result.insert(row.clone(), (*target).clone(), values.sum());
                }
            }
        }
        Ok(result)
    }

    /// Copy each source column onto one or more new columns.
    pub fn distribute<T>(
        &self,
        mapping: &BTreeMap<C, Vec<T>>,
        missing: MissingSources,
    ) -> BiogasResult<Table<R, T>>
    where
        T: Ord + Clone + Display,
        C: Display,
    {
        let available = self.columns();
        let mut assignments: BTreeMap<T, &C> = BTreeMap::new();
        for (source, targets) in mapping {
            if !available.contains(source) {
                if missing == MissingSources::Skip {
                    continue;
                }
                return Err(BiogasError::MissingSourceColumn(source.to_string()));
            }
            for target in targets {
                if assignments.insert(target.clone(), source).is_some() {
                    return Err(BiogasError::DuplicateTargetColumn(target.to_string()));
                }
            }
        }

        let mut result = Table::new();
        for (row, cols) in &self.rows {
            for (target, source) in &assignments {
                if let Some(value) = cols.get(*source) {
                    result.insert(row.clone(), target.clone(), *value);
                }
            }
        }
        Ok(result)
    }
}

impl<R: Ord + Clone, C: Ord + Clone> FromIterator<(R, C, f64)> for Table<R, C> {
    fn from_iter<I: IntoIterator<Item = (R, C, f64)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (r, c, v) in iter {
            table.insert(r, c, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table<&'static str, String> {
        [
            ("SE1", "a".to_string(), 1.0),
            ("SE1", "b".to_string(), 2.0),
            ("SE2", "b".to_string(), 5.0),
        ]
        .into_iter()
        .collect()
    }

    fn mapping(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn aggregate_sums_present_sources() {
        let agg = table()
            .aggregate(&mapping(&[("ab", &["a", "b"])]), MissingSources::Fail)
            .unwrap();
        assert_eq!(agg.get(&"SE1", &"ab".to_string()), Some(3.0));
        assert_eq!(agg.get(&"SE2", &"ab".to_string()), Some(5.0));
    }

    #[test]
    fn aggregate_missing_source_policy() {
        let map = mapping(&[("ac", &["a", "c"])]);
        assert!(matches!(
            table().aggregate(&map, MissingSources::Fail),
            Err(BiogasError::MissingSourceColumn(c)) if c == "c"
        ));
        let agg = table().aggregate(&map, MissingSources::Skip).unwrap();
        assert_eq!(agg.get(&"SE1", &"ac".to_string()), Some(1.0));
        // SE2 has none of the sources: no cell rather than zero.
        assert!(agg.row(&"SE2").is_none());
    }

    #[test]
    fn distribute_rejects_duplicate_targets() {
        let map = mapping(&[("a", &["x"]), ("b", &["x"])]);
        assert!(matches!(
            table().distribute(&map, MissingSources::Fail),
            Err(BiogasError::DuplicateTargetColumn(t)) if t == "x"
        ));
    }

    #[test]
    fn distribute_copies_columns() {
        let map = mapping(&[("b", &["x", "y"]), ("z", &["w"])]);
        let dist = table().distribute(&map, MissingSources::Skip).unwrap();
        assert_eq!(dist.get(&"SE2", &"x".to_string()), Some(5.0));
        assert_eq!(dist.get(&"SE2", &"y".to_string()), Some(5.0));
        assert_eq!(dist.columns().len(), 2);
    }
}
