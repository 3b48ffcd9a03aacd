//! The authoritative substrate ordering.
//!
//! Every vector the optimizer touches (available amounts, yields, DM, VS, C
//! and N fractions) is built through one [`SubstrateIndex`]. Alignment is an
//! explicit, checked step: a table that lacks an entry for an indexed key is a
//! [`BiogasError::MisalignedIndex`], never a silent zero.

use crate::error::{BiogasError, BiogasResult};
use crate::params::{lookup, CompositionTable, ParameterSet};
use crate::substrate::SubstrateKey;
use std::collections::BTreeMap;

/// Substrate amounts keyed by `(density, substrate)`.
pub type SubstrateVector = BTreeMap<SubstrateKey, f64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstrateIndex {
    keys: Vec<SubstrateKey>,
}

impl SubstrateIndex {
    /// Keys of a composition table in `(density, substrate)` order.
    pub fn from_table(table: &CompositionTable) -> Self {
        let keys = table
            .iter()
            .flat_map(|(density, subs)| subs.keys().map(|s| SubstrateKey::new(*density, *s)))
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[SubstrateKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn position(&self, key: &SubstrateKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Values of `vector` in index order; every key must be present.
    pub fn align(&self, name: &str, vector: &SubstrateVector) -> BiogasResult<Vec<f64>> {
        self.keys
            .iter()
            .map(|key| {
                vector.get(key).copied().ok_or_else(|| BiogasError::MisalignedIndex {
                    table: name.to_string(),
                    key: key.to_string(),
                })
            })
            .collect()
    }

    /// Values of a composition table in index order; every key must be present.
    pub fn align_table(&self, name: &str, table: &CompositionTable) -> BiogasResult<Vec<f64>> {
        self.keys
            .iter()
            .map(|key| {
                lookup(table, key).ok_or_else(|| BiogasError::MisalignedIndex {
                    table: name.to_string(),
                    key: key.to_string(),
                })
            })
            .collect()
    }

    /// Rebuild a keyed vector from index-ordered values.
    pub fn to_vector(&self, values: &[f64]) -> BiogasResult<SubstrateVector> {
        if values.len() != self.keys.len() {
            return Err(BiogasError::Validation(format!(
                "expected {} values for the substrate index, got {}",
                self.keys.len(),
                values.len()
            )));
        }
        Ok(self.keys.iter().copied().zip(values.iter().copied()).collect())
    }
}

/// Yield and composition vectors aligned to one [`SubstrateIndex`].
#[derive(Debug, Clone)]
pub struct Coefficients {
    pub index: SubstrateIndex,
    pub yields: Vec<f64>,
    pub dm: Vec<f64>,
    pub vs: Vec<f64>,
    pub c: Vec<f64>,
    pub n: Vec<f64>,
}

impl Coefficients {
    pub fn from_params(params: &ParameterSet) -> BiogasResult<Self> {
        let index = params.index();
        Ok(Self {
            yields: index.align_table("biogas_yields", &params.biogas_yields)?,
            dm: index.align_table("dm_fracs", &params.dm_fracs)?,
            vs: index.align_table("vs_fracs", &params.vs_fracs)?,
            c: index.align_table("c_fracs", &params.c_fracs)?,
            n: index.align_table("n_fracs", &params.n_fracs)?,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{Density, Substrate};

    #[test]
    fn coefficients_share_the_yield_order() {
        let params = ParameterSet::default();
        let coeffs = params.coefficients().unwrap();
        assert_eq!(coeffs.len(), 10);
        for (i, key) in coeffs.index.keys().iter().enumerate() {
            assert_eq!(Some(coeffs.dm[i]), lookup(&params.dm_fracs, key));
            assert_eq!(Some(coeffs.n[i]), lookup(&params.n_fracs, key));
        }
    }

    #[test]
    fn missing_coefficient_is_reported() {
        let mut params = ParameterSet::default();
        params
            .n_fracs
            .get_mut(&Density::Pigs)
            .unwrap()
            .remove(&Substrate::Solid);
        match params.coefficients() {
            Err(BiogasError::MisalignedIndex { table, key }) => {
                assert_eq!(table, "n_fracs");
                assert_eq!(key, "glw_pigs/solid");
            }
            other => panic!("expected misalignment, got {other:?}"),
        }
    }

    #[test]
    fn align_requires_every_key() {
        let index = ParameterSet::default().index();
        let mut vector: SubstrateVector = index.keys().iter().map(|k| (*k, 1.0)).collect();
        assert_eq!(index.align("point", &vector).unwrap().len(), index.len());
        vector.remove(&SubstrateKey::new(Density::Cropland, Substrate::Straw));
        assert!(index.align("point", &vector).is_err());
        assert!(index.to_vector(&[1.0]).is_err());
    }
}
