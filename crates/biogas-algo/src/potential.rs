//! Logistically limited biogas potential.
//!
//! The share of the theoretical potential that survives the blending
//! constraints is estimated from sample disks of the configured collection
//! radius, then applied to the theoretical potential of a set of regions.

use crate::optimizer::{biogas_production, maximize_production_table};
use crate::sample::SampleInventory;
use biogas_core::{BiogasResult, ParameterSet, RegionCode, SubstrateInventory, SubstrateVector};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Constrained over unconstrained production, summed over all samples of
/// the collection radius. 0 when the samples hold no producible substrate.
pub fn overall_limit(samples: &SampleInventory, params: &ParameterSet) -> BiogasResult<f64> {
    let samples = samples.at_radius(params.radius_km.round() as u32);
    let benchmark = biogas_production(&complete(samples.total(), params), params)?;
    if benchmark == 0.0 {
        return Ok(0.0);
    }
    let limited = SampleInventory {
        table: maximize_production_table(&samples.table, params)?,
    };
    let actual = biogas_production(&limited.total(), params)?;
    info!(samples = samples.len(), actual, benchmark, "overall limit computed");
    Ok(actual / benchmark)
}

/// Theoretical production of `regions` scaled by `limit`, MW.
///
/// Regions absent from the inventory contribute nothing.
pub fn total_potential<'a, I>(
    inventory: &SubstrateInventory,
    regions: I,
    limit: f64,
    params: &ParameterSet,
) -> BiogasResult<f64>
where
    I: IntoIterator<Item = &'a RegionCode>,
{
    Ok(theoretical_potential(inventory, regions, params)? * limit)
}

fn theoretical_potential<'a, I>(
    inventory: &SubstrateInventory,
    regions: I,
    params: &ParameterSet,
) -> BiogasResult<f64>
where
    I: IntoIterator<Item = &'a RegionCode>,
{
    biogas_production(&complete(inventory.total(regions), params), params)
}

/// Sums over an empty selection still have to align with the substrate index.
fn complete(mut total: SubstrateVector, params: &ParameterSet) -> SubstrateVector {
    for key in params.index().keys() {
        total.entry(*key).or_insert(0.0);
    }
    total
}

/// Potential of a set of regions, MW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialReport {
    pub regions: usize,
    pub samples: usize,
    pub theoretical_mw: f64,
    pub overall_limit: f64,
    pub constrained_mw: f64,
}

impl PotentialReport {
    pub fn compute(
        inventory: &SubstrateInventory,
        regions: &[RegionCode],
        samples: &SampleInventory,
        params: &ParameterSet,
    ) -> BiogasResult<Self> {
        let limit = overall_limit(samples, params)?;
        let theoretical = theoretical_potential(inventory, regions, params)?;
        Ok(Self {
            regions: regions.iter().filter(|r| inventory.row(r).is_some()).count(),
            samples: samples.at_radius(params.radius_km.round() as u32).len(),
            theoretical_mw: theoretical,
            overall_limit: limit,
            constrained_mw: theoretical * limit,
        })
    }
}
