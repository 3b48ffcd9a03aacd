//! Sample disk identifiers and raster sums.

use crate::region::RegionCode;
use crate::substrate::Density;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Centre (projected metres) and radius of a sample disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x_m: i64,
    pub y_m: i64,
    pub radius_km: u32,
}

impl SamplePoint {
    pub fn new(x_m: i64, y_m: i64, radius_km: u32) -> Self {
        Self { x_m, y_m, radius_km }
    }
}

/// Density-raster sums keyed by family, then by sample disk and region.
pub type SampleSums = BTreeMap<Density, BTreeMap<(SamplePoint, RegionCode), f64>>;

/// Density-raster sums keyed by family, then by region.
pub type RegionSums = BTreeMap<Density, BTreeMap<RegionCode, f64>>;
