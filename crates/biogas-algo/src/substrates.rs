//! Reconciliation of excretion and residues into one substrate inventory.

use crate::excretion::ExcretionTable;
use crate::residues::ResidueTable;
use biogas_core::{
    lookup, Basis, BiogasError, BiogasResult, Density, Management, ParameterSet, RegionCode,
    Substrate, SubstrateInventory, SubstrateKey, SubstrateVector, Table,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Straw used for bedding in one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Bedding {
    /// Straw each livestock family would bed its solid manure with.
    pub wish: BTreeMap<Density, f64>,
    /// Share of the wish the region's straw can cover, in `[0, 1]`.
    pub available: f64,
}

impl Bedding {
    pub fn new(wish: BTreeMap<Density, f64>, straw: f64) -> Self {
        let demand: f64 = wish.values().sum();
        let available = if demand == 0.0 {
            1.0
        } else {
            (straw / demand).min(1.0)
        };
        Self { wish, available }
    }

    pub fn used(&self, density: Density) -> f64 {
        self.wish.get(&density).copied().unwrap_or(0.0) * self.available
    }

    /// Solid manure that cannot be bedded and is handled as liquid instead.
    pub fn shortfall(&self, density: Density) -> f64 {
        self.wish.get(&density).copied().unwrap_or(0.0) - self.used(density)
    }

    pub fn total_used(&self) -> f64 {
        self.wish.keys().map(|d| self.used(*d)).sum()
    }
}

fn bedding_for(
    manure: &BTreeMap<(Density, Management), f64>,
    straw: f64,
    params: &ParameterSet,
) -> Bedding {
    let wish = params
        .solid_straw_bedding_ratio
        .iter()
        .filter_map(|(density, ratio)| {
            manure
                .get(&(*density, Management::Solid))
                .map(|solid| (*density, solid * ratio))
        })
        .collect();
    Bedding::new(wish, straw)
}

fn region_vector(
    manure: &BTreeMap<(Density, Management), f64>,
    residues: &BTreeMap<Substrate, f64>,
    bedding: &Bedding,
    params: &ParameterSet,
) -> SubstrateVector {
    let mut vector = SubstrateVector::new();

    for (residue, amount) in residues {
        let mut amount = *amount;
        if *residue == Substrate::Straw {
            amount -= bedding.total_used();
        }
        let collectable = (amount * params.removal_rate).max(0.0);
        vector.insert(SubstrateKey::new(Density::Cropland, *residue), collectable);
    }

    for ((density, management), amount) in manure {
        let shortfall = bedding.shortfall(*density);
        let amount = match management {
            Management::Solid => amount - shortfall,
            Management::Liquid => amount + shortfall,
            Management::Unavailable => continue,
        };
        if let Some(substrate) = management.substrate() {
            vector.insert(SubstrateKey::new(*density, substrate), amount);
        }
    }
    vector
}

/// Per-region substrate inventory in the requested basis.
///
/// Only regions present in both tables with a straw figure are considered.
/// A region is kept only if every substrate with a defined biogas yield
/// resolves to a finite value; no partial rows are produced.
pub fn substrates(
    excretion: &ExcretionTable,
    residues: &ResidueTable,
    params: &ParameterSet,
    basis: Basis,
) -> BiogasResult<SubstrateInventory> {
    let index = params.index();
    let straw_key = Substrate::Straw;

    let mut table: Table<RegionCode, SubstrateKey> = Table::new();
    let mut dropped = 0usize;
    for (region, manure) in excretion.rows() {
        let Some(crop_residues) = residues.row(region) else {
            dropped += 1;
            continue;
        };
        let Some(straw) = crop_residues.get(&straw_key) else {
            dropped += 1;
            continue;
        };

        let bedding = bedding_for(manure, *straw, params);
        let vector = region_vector(manure, crop_residues, &bedding, params);

        let complete = index
            .keys()
            .iter()
            .all(|key| vector.get(key).is_some_and(|v| v.is_finite()));
        if !complete {
            dropped += 1;
            continue;
        }

        for key in index.keys() {
            let mut value = vector[key];
            if basis == Basis::DryMatter {
                let vs = lookup(&params.vs_fracs, key).ok_or_else(|| {
                    BiogasError::MisalignedIndex {
                        table: "vs_fracs".to_string(),
                        key: key.to_string(),
                    }
                })?;
                value /= vs;
            }
            table.insert(region.clone(), *key, value);
        }
    }

    if dropped > 0 {
        debug!(dropped, "regions with incomplete substrate data dropped");
    }
    info!(regions = table.len(), %basis, "substrate inventory built");
    Ok(SubstrateInventory::new(basis, table))
}
