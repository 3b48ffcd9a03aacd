//! Harmonisation of raw statistics into the categories the estimators use.
//!
//! National manure-management reports give, per IPCC animal category, the
//! percentage of manure handled in each IPCC management system. They are
//! screened, collapsed onto the simplified management classes and copied
//! onto the livestock codes of the farm statistics. Survey head counts and
//! harvested areas are summed onto livestock and crop codes.

use biogas_core::{
    BiogasResult, Management, ManagementShares, MissingSources, RegionCode, RegionalStatistic,
    Table, Taxonomy,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// IPCC animal category -> IPCC management system -> allocation in percent.
pub type ManagementReport = Table<String, String>;

/// Screened shares of one report: livestock code -> management class -> fraction.
pub type ScreenedReport = Table<String, Management>;

/// Screen one country-year report.
///
/// Animal categories whose allocations do not add up to 100% within
/// `taxonomy.share_tolerance` are dropped.
pub fn screen_management_report(
    report: &ManagementReport,
    taxonomy: &Taxonomy,
) -> BiogasResult<ScreenedReport> {
    let mut fractions = report.clone();
    fractions.retain_rows(|category, systems| {
        let total: f64 = systems.values().map(|p| p / 100.0).sum();
        let consistent = (total - 1.0).abs() <= taxonomy.share_tolerance;
        if !consistent {
            debug!(%category, total, "management shares do not sum to one");
        }
        consistent
    });
    let fractions: ManagementReport = fractions
        .cells()
        .map(|(category, system, percent)| (category.clone(), system.clone(), percent / 100.0))
        .collect();

    let by_class = fractions.aggregate(&taxonomy.management_systems, MissingSources::Skip)?;
    let by_code = by_class
        .transpose()
        .distribute(&taxonomy.manure_animals, MissingSources::Skip)?;
    Ok(by_code.transpose())
}

/// Replace reports of one country with another country's, year by year.
///
/// A replaced country keeps a report only for the years it reported and the
/// substitute also reported.
pub fn apply_report_replacements<T: Clone>(
    reports: &mut BTreeMap<(RegionCode, i32), T>,
    replacements: &BTreeMap<String, String>,
) {
    for (replace, with) in replacements {
        let years: Vec<i32> = reports
            .keys()
            .filter(|(country, _)| country.as_str() == replace)
            .map(|(_, year)| *year)
            .collect();
        for year in years {
            let replaced = RegionCode::new(replace.as_str());
            reports.remove(&(replaced.clone(), year));
            match reports.get(&(RegionCode::new(with.as_str()), year)).cloned() {
                Some(substitute) => {
                    reports.insert((replaced, year), substitute);
                }
                None => warn!(%replace, %with, year, "no substitute report, year dropped"),
            }
        }
    }
}

/// Flatten screened reports into share records.
pub fn collect_management_shares(
    reports: &BTreeMap<(RegionCode, i32), ScreenedReport>,
) -> ManagementShares {
    reports
        .iter()
        .flat_map(|((country, year), report)| {
            report.cells().map(move |(animal, management, share)| {
                ((country.clone(), animal.clone(), *management), *year, share)
            })
        })
        .collect()
}

/// Sum survey head-count codes onto livestock codes, year by year.
pub fn harmonise_population(
    raw: &RegionalStatistic,
    taxonomy: &Taxonomy,
) -> BiogasResult<RegionalStatistic> {
    let by_year: Table<(RegionCode, i32), String> = raw
        .cells()
        .map(|((region, code), year, value)| ((region.clone(), year), code.clone(), value))
        .collect();
    let harmonised = by_year.aggregate(&taxonomy.population_codes, MissingSources::Fail)?;
    Ok(harmonised
        .cells()
        .map(|((region, year), code, value)| ((region.clone(), code.clone()), *year, value))
        .collect())
}

/// Multi-year mean harvested area per crop code, in hectares.
///
/// Every region in the survey carries every crop; unreported crops are 0 ha.
pub fn harmonise_areas(
    raw: &RegionalStatistic,
    taxonomy: &Taxonomy,
) -> BiogasResult<Table<RegionCode, String>> {
    let mean = raw.mean_table(&taxonomy.stat_years);
    let aggregated = mean.aggregate(&taxonomy.area_codes, MissingSources::Fail)?;

    let mut areas = Table::new();
    for region in mean.row_keys() {
        for crop in taxonomy.area_codes.keys() {
            let hectares = aggregated.get(region, crop).unwrap_or(0.0);
            areas.insert(region.clone(), crop.clone(), hectares);
        }
    }
    Ok(areas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_copies_substitute_years_only() {
        let mut reports: BTreeMap<(RegionCode, i32), &str> = [
            ((RegionCode::from("ES"), 2009), "es09"),
            ((RegionCode::from("ES"), 2010), "es10"),
            ((RegionCode::from("PT"), 2009), "pt09"),
        ]
        .into_iter()
        .collect();
        let replacements = [("ES".to_string(), "PT".to_string())].into_iter().collect();
        apply_report_replacements(&mut reports, &replacements);

        assert_eq!(reports.get(&(RegionCode::from("ES"), 2009)), Some(&"pt09"));
        assert!(!reports.contains_key(&(RegionCode::from("ES"), 2010)));
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn areas_fill_unreported_crops_with_zero() {
        let taxonomy = Taxonomy::default();
        let raw: RegionalStatistic = taxonomy
            .area_codes
            .values()
            .flatten()
            .map(|code| ((RegionCode::from("SE"), code.clone()), 2010, 1.0))
            .chain([((RegionCode::from("SE1"), "B_1_1_1_HA".to_string()), 2010, 4.0)])
            .collect();
        let areas = harmonise_areas(&raw, &taxonomy).unwrap();
        assert_eq!(areas.get(&RegionCode::from("SE1"), &"C1120".to_string()), Some(4.0));
        assert_eq!(areas.get(&RegionCode::from("SE1"), &"C1370".to_string()), Some(0.0));
        assert_eq!(areas.get(&RegionCode::from("SE"), &"C1370".to_string()), Some(1.0));
    }
}
