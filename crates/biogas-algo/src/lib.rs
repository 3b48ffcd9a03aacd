//! # biogas-algo: Substrate Estimation and Production Optimization
//!
//! The deterministic pipeline from raw statistics to biogas potential:
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | Harmonisation | [`prep::harmonise_population`], [`prep::harmonise_areas`] | statistics in model codes |
//! | Management shares | [`prep::screen_management_report`] | shares per livestock code |
//! | Excretion | [`excretion::excretion`] | Mg VS by density × management |
//! | Residues | [`residues::residues`] | Mg VS by residue type |
//! | Aggregation | [`substrates::substrates`] | [`SubstrateInventory`](biogas_core::SubstrateInventory) |
//! | Optimization | [`optimizer::maximize_production`] | usable substrate mix |
//! | Potential | [`potential::overall_limit`], [`potential::total_potential`] | MW |
//!
//! Every stage is a pure function of its inputs and the
//! [`ParameterSet`](biogas_core::ParameterSet). Regions that cannot be
//! resolved are dropped with a log line, never zero-filled.

pub mod excretion;
pub mod optimizer;
pub mod pipeline;
pub mod potential;
pub mod prep;
pub mod residues;
pub mod sample;
pub mod substrates;

pub use excretion::{excretion, ExcretionTable};
pub use optimizer::{
    biogas_production, maximize_production, maximize_production_table, ProductionProblem,
};
pub use pipeline::substrate_inventory;
pub use potential::{overall_limit, total_potential, PotentialReport};
pub use prep::{
    apply_report_replacements, collect_management_shares, harmonise_areas, harmonise_population,
    screen_management_report, ManagementReport, ScreenedReport,
};
pub use residues::{national_harvests, regional_harvests, residues, ResidueTable};
pub use sample::{sample_substrates, SampleFractions, SampleInventory};
pub use substrates::{substrates, Bedding};
