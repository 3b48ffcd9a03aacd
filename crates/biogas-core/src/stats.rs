//! Multi-year statistics as staged by the data-preparation layer.

use crate::region::{NutsHierarchy, RegionCode};
use crate::substrate::Management;
use crate::table::Table;
use std::collections::BTreeMap;

/// Values per key and reporting year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTable<K: Ord> {
    values: BTreeMap<K, BTreeMap<i32, f64>>,
}

impl<K: Ord> Default for YearlyTable<K> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> YearlyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, year: i32, value: f64) {
        self.values.entry(key).or_default().insert(year, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&K, i32, f64)> {
        self.values
            .iter()
            .flat_map(|(k, by_year)| by_year.iter().map(move |(y, v)| (k, *y, *v)))
    }

    /// Mean over whichever of `years` are reported. Keys with no finite value
    /// in those years are omitted.
    pub fn mean_over(&self, years: &[i32]) -> BTreeMap<K, f64> {
        let mut result = BTreeMap::new();
        for (key, by_year) in &self.values {
            let reported: Vec<f64> = years
                .iter()
                .filter_map(|y| by_year.get(y))
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if !reported.is_empty() {
                let mean = reported.iter().sum::<f64>() / reported.len() as f64;
                result.insert(key.clone(), mean);
            }
        }
        result
    }
}

impl<K: Ord + Clone> FromIterator<(K, i32, f64)> for YearlyTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, i32, f64)>>(iter: I) -> Self {
        let mut table = YearlyTable::new();
        for (key, year, value) in iter {
            table.insert(key, year, value);
        }
        table
    }
}

/// Regional statistic keyed by `(region, category)`: head counts, hectares or
/// harvest masses.
pub type RegionalStatistic = YearlyTable<(RegionCode, String)>;

/// Manure management shares keyed by `(region, animal category, system)`.
pub type ManagementShares = YearlyTable<(RegionCode, String, Management)>;

/// Staged statistics of one run.
#[derive(Debug, Clone, Default)]
pub struct StatisticsBundle {
    /// Screened management shares, keyed by livestock code.
    pub manure_shares: ManagementShares,
    /// Survey head counts, keyed by survey code.
    pub animal_population: RegionalStatistic,
    /// Survey harvested areas, keyed by survey code.
    pub harvested_areas: RegionalStatistic,
    /// Subnational harvests (1000 t), keyed by crop code.
    pub partial_harvests: RegionalStatistic,
    /// National harvests (1000 t), keyed by production code.
    pub national_harvests: RegionalStatistic,
    pub hierarchy: NutsHierarchy,
}

impl RegionalStatistic {
    /// Multi-year mean as a `region × category` table.
    pub fn mean_table(&self, years: &[i32]) -> Table<RegionCode, String> {
        self.mean_over(years)
            .into_iter()
            .map(|((region, category), value)| (region, category, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_unreported_years() {
        let key = (RegionCode::from("SE1"), "A2300F".to_string());
        let stats: RegionalStatistic = [
            (key.clone(), 2009, 10.0),
            (key.clone(), 2011, 20.0),
            (key.clone(), 2015, 1000.0),
            ((RegionCode::from("SE2"), "A2300F".to_string()), 2015, 5.0),
        ]
        .into_iter()
        .collect();

        let means = stats.mean_over(&[2009, 2010, 2011]);
        assert_eq!(means.get(&key), Some(&15.0));
        assert_eq!(means.len(), 1);
    }

    #[test]
    fn mean_ignores_non_finite_values() {
        let key = (RegionCode::from("SE"), "C1120".to_string());
        let stats: RegionalStatistic = [(key.clone(), 2009, f64::NAN), (key.clone(), 2010, 4.0)]
            .into_iter()
            .collect();
        assert_eq!(stats.mean_table(&[2009, 2010]).get(&key.0, &key.1), Some(4.0));
    }
}
