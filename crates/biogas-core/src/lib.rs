//! # biogas-core: Substrate Accounting Core Types
//!
//! Shared data model of the regional biogas-potential pipeline.
//!
//! ## Data Model
//!
//! - [`RegionCode`] / [`NutsHierarchy`] - hierarchical NUTS codes; nesting depth
//!   is encoded in code length (country = 2 characters, +1 per level)
//! - [`Density`], [`Management`], [`Substrate`], [`SubstrateKey`] - the fixed
//!   substrate taxonomy; density families partition substrates into disjoint
//!   groups (cropland residues and three livestock-manure families)
//! - [`Table`] - sparse keyed table where an absent cell is a missing value
//! - [`ParameterSet`] / [`Taxonomy`] - physical constants and category mappings
//! - [`SubstrateIndex`] / [`Coefficients`] - the single ordering every optimizer
//!   vector is aligned to
//! - [`SubstrateInventory`] - the per-region substrate table handed downstream
//!
//! ## Units
//!
//! Substrate masses are Mg volatile solids per year unless an inventory says
//! otherwise ([`Basis`]). Biogas production is MW (MW·yr per year).
//!
//! ## Error Handling
//!
//! Fatal structural problems are [`BiogasError`]s. Missing data is not an
//! error: rows that cannot be resolved are dropped by the stage that needs them.

pub mod error;
pub mod index;
pub mod inventory;
pub mod params;
pub mod region;
pub mod sample;
pub mod stats;
pub mod substrate;
pub mod table;
pub mod taxonomy;

pub use error::{BiogasError, BiogasResult};
pub use index::{Coefficients, SubstrateIndex, SubstrateVector};
pub use inventory::SubstrateInventory;
pub use params::{flatten, lookup, CompositionTable, ParameterSet, MJ_PER_MW_YEAR, MJ_PER_NM3_CH4};
pub use region::{NutsHierarchy, RegionCode, RegionSelection};
pub use sample::{RegionSums, SamplePoint, SampleSums};
pub use stats::{ManagementShares, RegionalStatistic, StatisticsBundle, YearlyTable};
pub use substrate::{Basis, Density, Management, Substrate, SubstrateKey};
pub use table::{MissingSources, Table};
pub use taxonomy::Taxonomy;
