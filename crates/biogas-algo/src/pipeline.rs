//! Raw statistics to substrate inventory in one call.

use crate::excretion::excretion;
use crate::prep::{harmonise_areas, harmonise_population};
use crate::residues::residues;
use crate::substrates::substrates;
use biogas_core::{
    Basis, BiogasResult, MissingSources, ParameterSet, StatisticsBundle, SubstrateInventory,
};

pub fn substrate_inventory(
    stats: &StatisticsBundle,
    params: &ParameterSet,
    basis: Basis,
) -> BiogasResult<SubstrateInventory> {
    let taxonomy = &params.taxonomy;
    let population = harmonise_population(&stats.animal_population, taxonomy)?;
    let manure = excretion(&stats.manure_shares, &population, params, MissingSources::Fail)?;

    let areas = harmonise_areas(&stats.harvested_areas, taxonomy)?;
    let crop_residues = residues(
        &areas,
        &stats.partial_harvests,
        &stats.national_harvests,
        &stats.hierarchy,
        params,
    )?;

    substrates(&manure, &crop_residues, params, basis)
}
