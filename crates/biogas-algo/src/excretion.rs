//! Manure excretion by density family and management class.
//!
//! Head counts are split by the (multi-year mean) management shares of the
//! region, falling back to the nearest ancestor that reports shares, then aggregated to excretion classes, weighted by excretion per head and
//! summed into livestock-density families.

use biogas_core::{
    BiogasError, BiogasResult, Density, Management, ManagementShares, MissingSources,
    ParameterSet, RegionCode, RegionalStatistic, Table,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Mg VS/yr keyed `region -> (density, management)`.
pub type ExcretionTable = Table<RegionCode, (Density, Management)>;

type ShareLookup = BTreeMap<(RegionCode, String), BTreeMap<Management, f64>>;

fn mean_shares(shares: &ManagementShares, years: &[i32]) -> ShareLookup {
    let mut lookup = ShareLookup::new();
    for ((region, animal, management), share) in shares.mean_over(years) {
        lookup
            .entry((region, animal))
            .or_default()
            .insert(management, share);
    }
    lookup
}

/// Excretion per region, density family and management class.
///
/// `population` is keyed by livestock code (head counts, poultry in 1000
/// heads) and `shares` by the same codes. `missing` governs livestock codes
/// named by an excretion class but absent from the data. Regions without a
/// share record anywhere in their ancestor chain yield no row.
pub fn excretion(
    shares: &ManagementShares,
    population: &RegionalStatistic,
    params: &ParameterSet,
    missing: MissingSources,
) -> BiogasResult<ExcretionTable> {
    let taxonomy = &params.taxonomy;
    let shares = mean_shares(shares, &taxonomy.stat_years);
    let population = population.mean_table(&taxonomy.stat_years);

    let mut heads: Table<(RegionCode, Management), String> = Table::new();
    for (region, animal, count) in population.cells() {
        let record = region
            .lineage()
            .find_map(|code| shares.get(&(code, animal.clone())));
        let Some(record) = record else {
            continue;
        };
        for (management, share) in record {
            heads.insert((region.clone(), *management), animal.clone(), count * share);
        }
    }

    let by_class = heads.aggregate(&taxonomy.excretion_classes, missing)?;

    let mut mass: Table<(RegionCode, Management), String> = Table::new();
    for (row, class, count) in by_class.cells() {
        let rate = params.excretion_per_head.get(class).ok_or_else(|| {
            BiogasError::Config(format!("no excretion rate for class '{class}'"))
        })?;
        mass.insert(row.clone(), class.clone(), count * rate);
    }

    let by_density = mass.aggregate(&taxonomy.density_classes, MissingSources::Skip)?;

    // A region that reports any livestock carries every family and class;
    // absent categories are zero, not missing.
    let mut result = ExcretionTable::new();
    for ((region, _), _) in by_density.rows() {
        for density in taxonomy.density_classes.keys() {
            for management in Management::ALL {
                result.insert(region.clone(), (*density, management), 0.0);
            }
        }
    }
    for ((region, management), density, value) in by_density.cells() {
        result.insert(region.clone(), (*density, *management), value);
    }

    let unresolved = population
        .row_keys()
        .filter(|region| !result.contains_row(region))
        .count();
    if unresolved > 0 {
        debug!(unresolved, "regions without management shares dropped");
    }
    info!(regions = result.len(), "excretion estimated");
    Ok(result)
}
