//! Crop residues from harvest statistics.
//!
//! Subnational harvests are incomplete. Each region's harvest of a crop is,
//! in order of preference: its own subnational record, the national figure
//! when the region is a country, or the country's harvest scaled by the
//! region's share of the country's harvested area.

use biogas_core::{
    BiogasResult, NutsHierarchy, ParameterSet, RegionCode, RegionalStatistic, Substrate, Table,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Mg VS/yr keyed `region -> residue type`.
pub type ResidueTable = Table<RegionCode, Substrate>;

/// Deepest NUTS level the estimation covers.
const MAX_RESIDUE_LEVEL: usize = 2;

/// National harvest per crop, choosing the first reported alternative code.
pub fn national_harvests(
    national: &RegionalStatistic,
    params: &ParameterSet,
) -> Table<RegionCode, String> {
    let taxonomy = &params.taxonomy;
    let reported = national.mean_table(&taxonomy.stat_years);
    let mut result = Table::new();
    for (region, cols) in reported.rows() {
        for (crop, alternatives) in &taxonomy.national_harvest_codes {
            if let Some(value) = alternatives.iter().find_map(|code| cols.get(code)) {
                result.insert(region.clone(), crop.clone(), value * taxonomy.harvest_unit_mg);
            }
        }
    }
    result
}

/// Harvest per region and crop in Mg, with missing cells estimated.
///
/// `areas` holds harvested hectares per crop code for every candidate
/// region; a crop with no recorded area counts as 0 ha. Cells that stay
/// unresolved (the country harvest itself is unknown) are left out.
pub fn regional_harvests(
    areas: &Table<RegionCode, String>,
    partial: &RegionalStatistic,
    national: &RegionalStatistic,
    hierarchy: &NutsHierarchy,
    params: &ParameterSet,
) -> Table<RegionCode, String> {
    let taxonomy = &params.taxonomy;
    let national = national_harvests(national, params);
    let partial = partial.mean_table(&taxonomy.stat_years);

    let candidates: BTreeSet<RegionCode> = (0..=MAX_RESIDUE_LEVEL)
        .flat_map(|level| hierarchy.level(level))
        .filter(|code| areas.contains_row(code))
        .collect();
    let crops = areas.columns();

    let mut harvests: Table<RegionCode, String> = Table::new();
    let mut missing: Vec<(RegionCode, String)> = Vec::new();
    for region in &candidates {
        for crop in &crops {
            let reported = partial
                .get(region, crop)
                .map(|v| v * taxonomy.harvest_unit_mg)
                .or_else(|| national.get(region, crop));
            match reported {
                Some(value) => harvests.insert(region.clone(), crop.clone(), value),
                None => missing.push((region.clone(), crop.clone())),
            }
        }
    }

    // Countries sort before their subregions, so a country's estimate is
    // always in place before a child reads it.
    missing.sort_by_key(|(region, _)| region.level());
    let mut estimated = 0usize;
    for (region, crop) in missing {
        let country = region.country();
        let own_area = areas.get(&region, &crop).unwrap_or(0.0);
        let country_area = areas.get(&country, &crop).unwrap_or(0.0);
        let harvest = if own_area == 0.0 || country_area == 0.0 {
            Some(0.0)
        } else if country == region {
            None
        } else {
            harvests
                .get(&country, &crop)
                .map(|h| h * own_area / country_area)
        };
        if let Some(harvest) = harvest {
            harvests.insert(region, crop, harvest);
            estimated += 1;
        }
    }
    debug!(estimated, "harvest cells estimated from harvested areas");
    harvests
}

/// Residue production per region and residue type, Mg VS/yr.
///
/// Regions with zero residue of every type are left out.
pub fn residues(
    areas: &Table<RegionCode, String>,
    partial: &RegionalStatistic,
    national: &RegionalStatistic,
    hierarchy: &NutsHierarchy,
    params: &ParameterSet,
) -> BiogasResult<ResidueTable> {
    let harvests = regional_harvests(areas, partial, national, hierarchy, params);

    let mut result = ResidueTable::new();
    for (region, crops) in harvests.rows() {
        let row: Vec<(Substrate, f64)> = params
            .residue_ratios
            .iter()
            .map(|(residue, ratios)| {
                let total = ratios
                    .iter()
                    .filter_map(|(crop, ratio)| crops.get(crop).map(|h| h * ratio))
                    .sum::<f64>();
                (*residue, total)
            })
            .collect();
        if row.iter().any(|(_, v)| *v != 0.0) {
            for (residue, value) in row {
                result.insert(region.clone(), residue, value);
            }
        }
    }
    info!(regions = result.len(), "residues estimated");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biogas_core::Taxonomy;

    fn params() -> ParameterSet {
        let mut params = ParameterSet::default();
        params.taxonomy = Taxonomy {
            stat_years: vec![2010],
            national_harvest_codes: [(
                "C1150".to_string(),
                vec!["C1150".to_string(), "C1140".to_string()],
            )]
            .into_iter()
            .collect(),
            harvest_unit_mg: 1.0,
            ..Taxonomy::default()
        };
        params
    }

    #[test]
    fn first_available_alternative_wins() {
        let national: RegionalStatistic = [
            ((RegionCode::from("SE"), "C1140".to_string()), 2010, 7.0),
            ((RegionCode::from("DK"), "C1150".to_string()), 2010, 3.0),
            ((RegionCode::from("DK"), "C1140".to_string()), 2010, 9.0),
        ]
        .into_iter()
        .collect();
        let table = national_harvests(&national, &params());
        assert_eq!(table.get(&RegionCode::from("SE"), &"C1150".to_string()), Some(7.0));
        assert_eq!(table.get(&RegionCode::from("DK"), &"C1150".to_string()), Some(3.0));
    }
}
