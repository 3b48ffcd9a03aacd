//! NUTS region codes and the administrative hierarchy.
//!
//! Nesting depth is encoded in code length: a country is two characters and
//! every deeper level appends one character, so `SE`, `SE1`, `SE11` are levels
//! 0, 1 and 2 of the same branch.

use crate::error::{BiogasError, BiogasResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const COUNTRY_CODE_LEN: usize = 2;

/// Hierarchical region identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        RegionCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nesting level: 0 for countries.
    pub fn level(&self) -> usize {
        self.0.len().saturating_sub(COUNTRY_CODE_LEN)
    }

    pub fn is_country(&self) -> bool {
        self.level() == 0
    }

    /// Level-0 prefix of the code. A country is its own country.
    pub fn country(&self) -> RegionCode {
        RegionCode(self.0.chars().take(COUNTRY_CODE_LEN).collect())
    }

    /// The code itself followed by each ancestor up to its country.
    pub fn lineage(&self) -> impl Iterator<Item = RegionCode> + '_ {
        (0..=self.level()).rev().map(move |level| self.prefix(level))
    }

    fn prefix(&self, level: usize) -> RegionCode {
        RegionCode(self.0.chars().take(level + COUNTRY_CODE_LEN).collect())
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(value: &str) -> Self {
        RegionCode::new(value)
    }
}

impl From<String> for RegionCode {
    fn from(value: String) -> Self {
        RegionCode(value)
    }
}

/// Lookup structure over a closed set of NUTS codes.
#[derive(Debug, Clone, Default)]
pub struct NutsHierarchy {
    codes: BTreeSet<RegionCode>,
    children: BTreeMap<RegionCode, BTreeSet<RegionCode>>,
    levels: BTreeMap<usize, BTreeSet<RegionCode>>,
}

impl NutsHierarchy {
    /// Build the hierarchy from a flat list of codes.
    ///
    /// A code's parent is the code one character shorter; codes whose parent
    /// is not listed are still queryable but have no ancestor entry.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RegionCode>,
    {
        let codes: BTreeSet<RegionCode> = codes.into_iter().map(Into::into).collect();
        let mut children: BTreeMap<RegionCode, BTreeSet<RegionCode>> = BTreeMap::new();
        let mut levels: BTreeMap<usize, BTreeSet<RegionCode>> = BTreeMap::new();

        for code in &codes {
            levels.entry(code.level()).or_default().insert(code.clone());
            if !code.is_country() {
                let parent = code.prefix(code.level() - 1);
                if codes.contains(&parent) {
                    children.entry(parent).or_default().insert(code.clone());
                }
            }
        }

        Self {
            codes,
            children,
            levels,
        }
    }

    pub fn contains(&self, code: &RegionCode) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &RegionCode> {
        self.codes.iter()
    }

    /// Ancestor of `code` at a strictly shallower `level`.
    pub fn ancestor(&self, code: &RegionCode, level: usize) -> BiogasResult<RegionCode> {
        if level >= code.level() {
            return Err(BiogasError::InvalidLevelQuery {
                code: code.to_string(),
                own: code.level(),
                requested: level,
            });
        }
        Ok(code.prefix(level))
    }

    pub fn parent(&self, code: &RegionCode) -> BiogasResult<RegionCode> {
        self.ancestor(code, code.level().saturating_sub(1))
    }

    /// Direct children. Leaves yield an empty set.
    pub fn children(&self, code: &RegionCode) -> BiogasResult<BTreeSet<RegionCode>> {
        if !self.contains(code) {
            return Err(BiogasError::UnknownRegion(code.to_string()));
        }
        Ok(self.children.get(code).cloned().unwrap_or_default())
    }

    /// Descendants of `code` at a strictly deeper `level`.
    pub fn descendants(&self, code: &RegionCode, level: usize) -> BiogasResult<BTreeSet<RegionCode>> {
        if level <= code.level() {
            return Err(BiogasError::InvalidLevelQuery {
                code: code.to_string(),
                own: code.level(),
                requested: level,
            });
        }
        let children = self.children(code)?;
        if level == code.level() + 1 {
            return Ok(children);
        }
        let mut result = BTreeSet::new();
        for child in &children {
            result.extend(self.descendants(child, level)?);
        }
        Ok(result)
    }

    /// All codes at nesting level `n`.
    pub fn level(&self, n: usize) -> BTreeSet<RegionCode> {
        self.levels.get(&n).cloned().unwrap_or_default()
    }
}

/// Which level each country is analysed at.
///
/// `overrides` maps a country code to a level, or to `None` to exclude the
/// country altogether.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSelection {
    #[serde(default = "default_selection_level")]
    pub default_level: usize,
    #[serde(default)]
    pub overrides: BTreeMap<String, Option<usize>>,
}

fn default_selection_level() -> usize {
    2
}

impl Default for RegionSelection {
    fn default() -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert("DE".to_string(), Some(1));
        overrides.insert("MT".to_string(), None);
        Self {
            default_level: default_selection_level(),
            overrides,
        }
    }
}

impl RegionSelection {
    /// Partition of included regions: each selected country contributes its
    /// descendants at the chosen level.
    pub fn included_regions(&self, hierarchy: &NutsHierarchy) -> BiogasResult<BTreeSet<RegionCode>> {
        let mut included = BTreeSet::new();
        for country in hierarchy.level(0) {
            let level = match self.overrides.get(country.as_str()) {
                Some(None) => continue,
                Some(Some(level)) => *level,
                None => self.default_level,
            };
            if level == 0 {
                included.insert(country);
            } else {
                included.extend(hierarchy.descendants(&country, level)?);
            }
        }
        Ok(included)
    }
}
