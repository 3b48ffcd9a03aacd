//! Substrate inventories of sample disks.
//!
//! A sample disk overlaps one or more regions. Its share of a region's
//! substrates is the share of the region's density raster (cropland or
//! livestock density) that falls inside the disk.

use biogas_core::{
    Density, RegionCode, RegionSums, SamplePoint, SampleSums, SubstrateInventory, SubstrateKey,
    SubstrateVector, Table,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Each sample's fraction of each region it overlaps, per density family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFractions {
    fractions: Table<(SamplePoint, RegionCode), Density>,
}

impl SampleFractions {
    /// Divide sample sums by the sums of the whole region.
    ///
    /// Regions without a sum are dropped; a zero region sum gives a zero
    /// fraction. A (sample, region) pair is kept only if every family has a
    /// fraction.
    pub fn from_sums(sample_sums: &SampleSums, region_sums: &RegionSums) -> Self {
        let mut fractions: Table<(SamplePoint, RegionCode), Density> = Table::new();
        for (density, samples) in sample_sums {
            let Some(regions) = region_sums.get(density) else {
                continue;
            };
            for ((point, region), sum) in samples {
                let Some(total) = regions.get(region) else {
                    continue;
                };
                let fraction = if *total == 0.0 { 0.0 } else { sum / total };
                if fraction.is_finite() {
                    fractions.insert((*point, region.clone()), *density, fraction);
                }
            }
        }

        let families = sample_sums.len();
        let before = fractions.len();
        fractions.retain_rows(|_, cols| cols.len() == families);
        if fractions.len() < before {
            debug!(dropped = before - fractions.len(), "incomplete sample fractions dropped");
        }
        Self { fractions }
    }

    pub fn get(&self, point: &SamplePoint, region: &RegionCode, density: Density) -> Option<f64> {
        self.fractions.get(&(*point, region.clone()), &density)
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (&(SamplePoint, RegionCode), &BTreeMap<Density, f64>)> {
        self.fractions.rows()
    }
}

/// Substrate inventory per sample disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleInventory {
    pub table: Table<SamplePoint, SubstrateKey>,
}

impl SampleInventory {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Samples of one disk radius.
    pub fn at_radius(&self, radius_km: u32) -> SampleInventory {
        let mut table = self.table.clone();
        table.retain_rows(|point, _| point.radius_km == radius_km);
        SampleInventory { table }
    }

    /// Column-wise sum over all samples.
    pub fn total(&self) -> SubstrateVector {
        let mut total = SubstrateVector::new();
        for (_, key, value) in self.table.cells() {
            *total.entry(*key).or_insert(0.0) += value;
        }
        total
    }
}

/// Distribute each region's substrates onto the samples overlapping it.
///
/// Every sample row carries every inventory column; contributions missing
/// for a family count as zero.
pub fn sample_substrates(
    inventory: &SubstrateInventory,
    fractions: &SampleFractions,
) -> SampleInventory {
    let columns = inventory.table.columns();
    let mut table: Table<SamplePoint, SubstrateKey> = Table::new();
    for ((point, region), by_density) in fractions.entries() {
        let Some(row) = inventory.row(region) else {
            continue;
        };
        for key in &columns {
            let contribution = match (row.get(key), by_density.get(&key.density)) {
                (Some(amount), Some(fraction)) => amount * fraction,
                _ => 0.0,
            };
            let current = table.get(point, key).unwrap_or(0.0);
            table.insert(*point, *key, current + contribution);
        }
    }
    debug!(samples = table.len(), "sample substrates distributed");
    SampleInventory { table }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_require_every_family() {
        let p = SamplePoint::new(0, 0, 20);
        let se11 = RegionCode::from("SE11");
        let se12 = RegionCode::from("SE12");
        let sample_sums: SampleSums = [
            (
                Density::Cropland,
                [((p, se11.clone()), 5.0), ((p, se12.clone()), 1.0)].into_iter().collect(),
            ),
            (Density::Cattle, [((p, se11.clone()), 2.0)].into_iter().collect()),
        ]
        .into_iter()
        .collect();
        let region_sums: RegionSums = [
            (
                Density::Cropland,
                [(se11.clone(), 10.0), (se12.clone(), 4.0)].into_iter().collect(),
            ),
            (Density::Cattle, [(se11.clone(), 0.0)].into_iter().collect()),
        ]
        .into_iter()
        .collect();

        let fractions = SampleFractions::from_sums(&sample_sums, &region_sums);
        assert_eq!(fractions.len(), 1);
        assert_eq!(fractions.get(&p, &se11, Density::Cropland), Some(0.5));
        assert_eq!(fractions.get(&p, &se11, Density::Cattle), Some(0.0));
        assert_eq!(fractions.get(&p, &se12, Density::Cropland), None);
    }

    #[test]
    fn at_radius_filters_rows() {
        let straw = SubstrateKey::new(Density::Cropland, biogas_core::Substrate::Straw);
        let table = [
            (SamplePoint::new(0, 0, 10), straw, 1.0),
            (SamplePoint::new(0, 0, 20), straw, 2.0),
        ]
        .into_iter()
        .collect();
        let samples = SampleInventory { table };
        let ten = samples.at_radius(10);
        assert_eq!(ten.len(), 1);
        assert_eq!(ten.total().get(&straw), Some(&1.0));
    }
}
