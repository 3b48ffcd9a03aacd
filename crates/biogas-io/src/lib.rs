//! # biogas-io: Staged Data and Result Files
//!
//! File formats read and written around the pipeline:
//!
//! | Data | Format | Module |
//! |------|--------|--------|
//! | Parameter set | YAML / JSON | [`params`] |
//! | Staged statistics | long CSV per statistic | [`statistics`] |
//! | Management reports | long CSV, notation keys allowed | [`reports`] |
//! | Substrate inventory | wide CSV | [`inventory`] |
//! | Raster sums | CSV (samples), JSON (regions) | [`samples`] |
//! | Optimization results | CSV, JSON | [`export`] |
//!
//! Every function returns `anyhow::Result` with the offending path in the
//! error context.

pub mod export;
pub mod inventory;
pub mod params;
pub mod reports;
pub mod samples;
pub mod statistics;

pub use export::{write_json, write_production_csv, ProductionRow};
pub use inventory::{read_inventory_csv, write_inventory_csv};
pub use params::{load_parameters, parameters_to_yaml, resolve_parameters, write_parameters_yaml};
pub use reports::{parse_report_value, read_management_reports, ReportSet};
pub use samples::{read_region_sums, read_sample_sums};
pub use statistics::{
    load_statistics_dir, read_regions, read_shares, read_statistic, write_shares_csv,
    ANIMAL_POPULATION_FILE, HARVESTED_AREAS_FILE, MANURE_SHARES_FILE, NATIONAL_HARVESTS_FILE,
    PARTIAL_HARVESTS_FILE, REGIONS_FILE,
};
