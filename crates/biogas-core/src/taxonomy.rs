//! Category mappings between statistical sources and model classes.
//!
//! Every mapping is `target -> [sources]` and is applied with
//! [`Table::aggregate`](crate::Table::aggregate) or
//! [`Table::distribute`](crate::Table::distribute). The defaults reproduce the
//! Eurostat / national-inventory category codes used by the study.

use crate::region::RegionSelection;
use crate::substrate::{Density, Management};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    /// Years averaged for every multi-year statistic.
    pub stat_years: Vec<i32>,
    /// Excretion class -> Eurostat livestock codes.
    pub excretion_classes: BTreeMap<String, Vec<String>>,
    /// Density family -> excretion classes.
    pub density_classes: BTreeMap<Density, Vec<String>>,
    /// Simplified management class -> inventory management systems.
    pub management_systems: BTreeMap<Management, Vec<String>>,
    /// Inventory animal category -> Eurostat livestock codes.
    pub manure_animals: BTreeMap<String, Vec<String>>,
    /// Eurostat livestock code -> farm-survey head-count codes.
    pub population_codes: BTreeMap<String, Vec<String>>,
    /// Crop code -> farm-survey harvested-area codes.
    pub area_codes: BTreeMap<String, Vec<String>>,
    /// Crop code -> national production codes, in order of preference.
    pub national_harvest_codes: BTreeMap<String, Vec<String>>,
    /// Country whose management reports are replaced -> substitute country.
    pub manure_report_replacements: BTreeMap<String, String>,
    /// Allowed deviation of a management-share row sum from 1.
    pub share_tolerance: f64,
    /// Mg per reported harvest unit (production is reported in 1000 t).
    pub harvest_unit_mg: f64,
    pub region_selection: RegionSelection,
}

fn mapping<K: Ord>(entries: Vec<(K, &[&str])>) -> BTreeMap<K, Vec<String>> {
    entries
        .into_iter()
        .map(|(k, v)| (k, v.iter().map(|s| s.to_string()).collect()))
        .collect()
}

fn string_mapping(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    mapping(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect())
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            stat_years: vec![2009, 2010, 2011],
            excretion_classes: string_mapping(&[
                ("dairy cows", &["A2300F"]),
                (
                    "other cattle",
                    &["A2010", "A2120", "A2130", "A2220", "A2230", "A2300G"],
                ),
                ("breeding swine", &["A3120"]),
                ("market swine", &["C_4_99_HEADS"]),
                ("hens", &["A5110O"]),
                ("broilers", &["A5140"]),
            ]),
            density_classes: mapping(vec![
                (Density::Cattle, &["dairy cows", "other cattle"][..]),
                (Density::Pigs, &["breeding swine", "market swine"][..]),
                (Density::Chickens, &["hens", "broilers"][..]),
            ]),
            management_systems: mapping(vec![
                (Management::Liquid, &["Anaerobic lagoon", "Liquid system"][..]),
                (Management::Solid, &["Solid storage", "Dry lot", "Other"][..]),
                (
                    Management::Unavailable,
                    &["Pasture range paddock", "Daily spread"][..],
                ),
            ]),
            manure_animals: string_mapping(&[
                ("Dairy Cattle", &["A2300F"]),
                (
                    "Non-Dairy Cattle",
                    &["A2010", "A2120", "A2130", "A2220", "A2230", "A2300G"],
                ),
                ("Swine", &["A3120", "C_4_99_HEADS"]),
                ("Poultry", &["A5110O", "A5140"]),
            ]),
            population_codes: string_mapping(&[
                ("A2010", &["C_2_1_HEADS"]),
                ("A2120", &["C_2_2_HEADS"]),
                ("A2220", &["C_2_3_HEADS"]),
                ("A2130", &["C_2_4_HEADS"]),
                ("A2230", &["C_2_5_HEADS"]),
                ("A2300G", &["C_2_99_HEADS"]),
                ("A2300F", &["C_2_6_HEADS"]),
                ("A4100", &["C_3_1_HEADS"]),
                ("A3120", &["C_4_2_HEADS"]),
                ("C_4_99_HEADS", &["C_4_99_HEADS"]),
                ("A5140", &["C_5_1_1000_HEADS"]),
                ("A5110O", &["C_5_2_1000_HEADS"]),
            ]),
            area_codes: string_mapping(&[
                ("C1120", &["B_1_1_1_HA"]),
                ("C1130", &["B_1_1_2_HA"]),
                ("C1150", &["B_1_1_3_HA"]),
                ("C1160", &["B_1_1_4_HA"]),
                ("C1180", &["B_1_1_5_HA"]),
                ("C1200", &["B_1_1_6_HA"]),
                ("C1370", &["B_1_4_HA"]),
                ("C1420", &["B_1_6_4_HA"]),
                ("C1450", &["B_1_6_5_HA"]),
            ]),
            national_harvest_codes: string_mapping(&[
                ("C1120", &["C1120"]),
                ("C1130", &["C1130"]),
                ("C1150", &["C1150", "C1140"]),
                ("C1160", &["C1160"]),
                ("C1180", &["C1180"]),
                ("C1200", &["C1201"]),
                ("C1370", &["C1370"]),
                ("C1420", &["C1420"]),
                ("C1450", &["C1450"]),
            ]),
            manure_report_replacements: [("ES".to_string(), "PT".to_string())]
                .into_iter()
                .collect(),
            share_tolerance: 0.01,
            harvest_unit_mg: 1000.0,
            region_selection: RegionSelection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_density_class_has_an_excretion_mapping() {
        let taxonomy = Taxonomy::default();
        for classes in taxonomy.density_classes.values() {
            for class in classes {
                assert!(
                    taxonomy.excretion_classes.contains_key(class),
                    "class {class} has no livestock codes"
                );
            }
        }
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let taxonomy: Taxonomy = serde_yaml::from_str("stat_years: [2010]\n").unwrap();
        assert_eq!(taxonomy.stat_years, vec![2010]);
        assert_eq!(taxonomy.share_tolerance, 0.01);
        assert_eq!(taxonomy.national_harvest_codes["C1150"], vec!["C1150", "C1140"]);
    }
}
