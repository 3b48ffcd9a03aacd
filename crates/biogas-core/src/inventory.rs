//! Per-region substrate inventory.

use crate::index::SubstrateVector;
use crate::region::RegionCode;
use crate::substrate::{Basis, SubstrateKey};
use crate::table::Table;
use std::collections::BTreeMap;

/// Authoritative `region -> (density, substrate) -> mass` table.
///
/// Masses are Mg VS/yr or Mg DM/yr depending on [`SubstrateInventory::basis`].
/// Every row carries every column; incomplete regions never enter.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstrateInventory {
    pub basis: Basis,
    pub table: Table<RegionCode, SubstrateKey>,
}

impl SubstrateInventory {
    pub fn new(basis: Basis, table: Table<RegionCode, SubstrateKey>) -> Self {
        Self { basis, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionCode> {
        self.table.row_keys()
    }

    pub fn get(&self, region: &RegionCode, key: &SubstrateKey) -> Option<f64> {
        self.table.get(region, key)
    }

    pub fn row(&self, region: &RegionCode) -> Option<&SubstrateVector> {
        self.table.row(region)
    }

    /// Column-wise sum over the listed regions; unknown regions are skipped.
    pub fn total<'a, I>(&self, regions: I) -> SubstrateVector
    where
        I: IntoIterator<Item = &'a RegionCode>,
    {
        let mut total = SubstrateVector::new();
        for region in regions {
            if let Some(row) = self.table.row(region) {
                for (key, value) in row {
                    *total.entry(*key).or_insert(0.0) += value;
                }
            }
        }
        total
    }

    /// Amount of one substrate per unit of the region's density raster.
    ///
    /// Regions whose raster sum is zero get 0; regions missing either value
    /// are dropped.
    pub fn coverage_density(
        &self,
        key: &SubstrateKey,
        regional_sums: &BTreeMap<RegionCode, f64>,
    ) -> BTreeMap<RegionCode, f64> {
        self.table
            .rows()
            .filter_map(|(region, row)| {
                let amount = *row.get(key)?;
                let sum = *regional_sums.get(region)?;
                let density = if sum == 0.0 { 0.0 } else { amount / sum };
                density.is_finite().then(|| (region.clone(), density))
            })
            .collect()
    }
}
