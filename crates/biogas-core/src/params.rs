//! Physical and process constants of the pipeline.
//!
//! Composition tables are keyed `density -> substrate`. Fractions chain:
//! `DM / wet mass`, `VS / DM`, and `C / VS`, `N / VS`. Biogas yields are
//! expressed in MW·yr of methane energy per Mg VS.

use crate::error::{BiogasError, BiogasResult};
use crate::index::{Coefficients, SubstrateIndex};
use crate::substrate::{Density, Substrate, SubstrateKey};
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Energy content of methane.
pub const MJ_PER_NM3_CH4: f64 = 40.0;
/// One MW sustained over a (tropical) year.
pub const MJ_PER_MW_YEAR: f64 = 31_556_925.9747;

pub type CompositionTable = BTreeMap<Density, BTreeMap<Substrate, f64>>;

/// Flatten a composition table onto substrate keys.
pub fn flatten(table: &CompositionTable) -> BTreeMap<SubstrateKey, f64> {
    table
        .iter()
        .flat_map(|(density, subs)| {
            subs.iter()
                .map(move |(substrate, v)| (SubstrateKey::new(*density, *substrate), *v))
        })
        .collect()
}

pub fn lookup(table: &CompositionTable, key: &SubstrateKey) -> Option<f64> {
    table.get(&key.density)?.get(&key.substrate).copied()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub dm_fracs: CompositionTable,
    pub vs_fracs: CompositionTable,
    pub c_fracs: CompositionTable,
    pub n_fracs: CompositionTable,
    /// MW·yr per Mg VS. Keys define the substrates the optimizer works on.
    pub biogas_yields: CompositionTable,
    /// Mg VS per head and year, by excretion class.
    pub excretion_per_head: BTreeMap<String, f64>,
    /// Mg bedding straw (VS) per Mg solid manure (VS).
    pub solid_straw_bedding_ratio: BTreeMap<Density, f64>,
    /// Residue type -> crop -> Mg residue VS per Mg harvest.
    pub residue_ratios: BTreeMap<Substrate, BTreeMap<String, f64>>,
    /// Share of field residues that may be collected at all.
    pub removal_rate: f64,
    pub d_min: f64,
    pub d_max: f64,
    pub cn_min: f64,
    pub cn_max: f64,
    /// Minimum plant size, MW.
    pub p_min: f64,
    /// Collection radius of sample disks, km.
    pub radius_km: f64,
    pub taxonomy: Taxonomy,
}

fn composition(entries: &[(Density, &[(Substrate, f64)])]) -> CompositionTable {
    entries
        .iter()
        .map(|(density, subs)| (*density, subs.iter().copied().collect()))
        .collect()
}

fn per_family(
    liquid_solid: [(Density, f64, f64); 3],
    residues: [(Substrate, f64); 4],
) -> CompositionTable {
    let mut table: CompositionTable = liquid_solid
        .into_iter()
        .map(|(d, liquid, solid)| {
            (
                d,
                [(Substrate::Liquid, liquid), (Substrate::Solid, solid)]
                    .into_iter()
                    .collect(),
            )
        })
        .collect();
    table.insert(Density::Cropland, residues.into_iter().collect());
    table
}

impl Default for ParameterSet {
    fn default() -> Self {
        use Density::*;
        use Substrate::*;

        let dm_fracs = per_family(
            [(Cattle, 0.08, 0.2), (Pigs, 0.06, 0.2), (Chickens, 0.30, 0.70)],
            [(Straw, 0.85), (Stover, 0.85), (SunflowerStalks, 0.85), (BeetTops, 0.13)],
        );
        let vs_fracs = per_family(
            [(Cattle, 0.8, 0.85), (Pigs, 0.8, 0.85), (Chickens, 0.7, 0.7)],
            [(Straw, 0.9), (Stover, 0.9), (SunflowerStalks, 0.9), (BeetTops, 0.9)],
        );
        let c_fracs = per_family(
            [(Cattle, 0.55, 0.55), (Pigs, 0.55, 0.55), (Chickens, 0.55, 0.55)],
            [(Straw, 0.55), (Stover, 0.55), (SunflowerStalks, 0.55), (BeetTops, 0.55)],
        );
        let n_fracs = per_family(
            [(Cattle, 0.07, 0.035), (Pigs, 0.10, 0.05), (Chickens, 0.09, 0.09)],
            [(Straw, 0.005), (Stover, 0.005), (SunflowerStalks, 0.005), (BeetTops, 0.025)],
        );

        // m3 CH4 / Mg VS
        let mut biogas_yields = composition(&[
            (
                Cropland,
                &[
                    (Straw, 200.0),
                    (BeetTops, 300.0),
                    (SunflowerStalks, 200.0),
                    (Stover, 200.0),
                ],
            ),
            (Pigs, &[(Liquid, 200.0), (Solid, 200.0)]),
            (Cattle, &[(Liquid, 200.0), (Solid, 200.0)]),
            (Chickens, &[(Liquid, 250.0), (Solid, 250.0)]),
        ]);
        for v in biogas_yields.values_mut().flat_map(|s| s.values_mut()) {
            *v *= MJ_PER_NM3_CH4 / MJ_PER_MW_YEAR;
        }

        let excretion_per_head: BTreeMap<String, f64> = [
            ("dairy cows", 5.1 * 365.0 / 1000.0),
            ("other cattle", 2.6 * 365.0 / 1000.0),
            ("breeding swine", 0.5 * 365.0 / 1000.0),
            ("market swine", 0.3 * 365.0 / 1000.0),
            ("goats", 0.3 * 365.0 / 1000.0),
            // Poultry is counted in 1000 heads: DM per year times a VS/DM estimate.
            ("hens", 11.0 / 1000.0 * 0.7 * 1000.0),
            ("broilers", 7.0 / 1000.0 * 0.7 * 1000.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let solid_straw_bedding_ratio: BTreeMap<Density, f64> =
            [(Cattle, 1.0), (Pigs, 1.0), (Chickens, 0.0)].into_iter().collect();

        // Wet residue per reported harvest, converted to VS below.
        let wet_ratios: [(Substrate, &[(&str, f64)]); 4] = [
            (
                Straw,
                &[
                    ("C1120", 0.9),
                    ("C1130", 0.9),
                    ("C1150", 1.1),
                    ("C1160", 0.7),
                    ("C1180", 0.8),
                    ("C1420", 1.2),
                ],
            ),
            (Stover, &[("C1200", 1.0)]),
            (BeetTops, &[("C1370", 0.6)]),
            (SunflowerStalks, &[("C1450", 2.0)]),
        ];
        let residue_ratios: BTreeMap<Substrate, BTreeMap<String, f64>> = wet_ratios
            .iter()
            .map(|(residue, crops)| {
                let key = SubstrateKey::new(Cropland, *residue);
                let to_vs = lookup(&dm_fracs, &key).unwrap_or(0.0)
                    * lookup(&vs_fracs, &key).unwrap_or(0.0);
                let crops: BTreeMap<String, f64> = crops
                    .iter()
                    .map(|(c, r)| (c.to_string(), r * to_vs))
                    .collect();
                (*residue, crops)
            })
            .collect();

        Self {
            dm_fracs,
            vs_fracs,
            c_fracs,
            n_fracs,
            biogas_yields,
            excretion_per_head,
            solid_straw_bedding_ratio,
            residue_ratios,
            removal_rate: 0.4,
            d_min: 0.0,
            d_max: 0.12,
            cn_min: 10.0,
            cn_max: 35.0,
            p_min: 1.0,
            radius_km: 20.0,
            taxonomy: Taxonomy::default(),
        }
    }
}

/// Scalar knobs that may be overridden for sensitivity runs.
pub const SCALAR_PARAMETERS: &[&str] = &[
    "removal_rate",
    "d_min",
    "d_max",
    "cn_min",
    "cn_max",
    "p_min",
    "radius_km",
];

impl ParameterSet {
    /// Authoritative substrate ordering, taken from the yield table.
    pub fn index(&self) -> SubstrateIndex {
        SubstrateIndex::from_table(&self.biogas_yields)
    }

    /// Composition and yield vectors aligned to [`ParameterSet::index`].
    pub fn coefficients(&self) -> BiogasResult<Coefficients> {
        Coefficients::from_params(self)
    }

    pub fn with_removal_rate(mut self, rate: f64) -> BiogasResult<Self> {
        self.set_scalar("removal_rate", rate)?;
        Ok(self)
    }

    /// Override one named scalar and re-validate the set.
    pub fn set_scalar(&mut self, name: &str, value: f64) -> BiogasResult<()> {
        let previous = self.clone();
        let slot = match name {
            "removal_rate" => &mut self.removal_rate,
            "d_min" => &mut self.d_min,
            "d_max" => &mut self.d_max,
            "cn_min" => &mut self.cn_min,
            "cn_max" => &mut self.cn_max,
            "p_min" => &mut self.p_min,
            "radius_km" => &mut self.radius_km,
            other => {
                return Err(BiogasError::Config(format!(
                    "unknown parameter '{other}'; supported values: {}",
                    SCALAR_PARAMETERS.join(", ")
                )))
            }
        };
        *slot = value;
        if let Err(err) = self.validate() {
            *self = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Apply `name=value` overrides in order.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> BiogasResult<()> {
        for spec in overrides {
            let spec = spec.as_ref();
            let (name, value) = spec
                .split_once('=')
                .ok_or_else(|| BiogasError::Config(format!("override '{spec}' is not name=value")))?;
            let value: f64 = value.trim().parse().map_err(|_| {
                BiogasError::Config(format!("override '{spec}' has a non-numeric value"))
            })?;
            self.set_scalar(name.trim(), value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> BiogasResult<()> {
        if !(0.0..=1.0).contains(&self.removal_rate) {
            return Err(BiogasError::Config(format!(
                "removal rate must be between 0 and 1, got {}",
                self.removal_rate
            )));
        }
        if self.d_min > self.d_max {
            return Err(BiogasError::Config(format!(
                "d_min ({}) exceeds d_max ({})",
                self.d_min, self.d_max
            )));
        }
        if self.cn_min > self.cn_max {
            return Err(BiogasError::Config(format!(
                "cn_min ({}) exceeds cn_max ({})",
                self.cn_min, self.cn_max
            )));
        }
        for (name, value) in [
            ("d_min", self.d_min),
            ("cn_min", self.cn_min),
            ("p_min", self.p_min),
            ("radius_km", self.radius_km),
        ] {
            if !(value >= 0.0) {
                return Err(BiogasError::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        for (density, ratio) in &self.solid_straw_bedding_ratio {
            if !(0.0..=1.0).contains(ratio) {
                return Err(BiogasError::Config(format!(
                    "bedding ratio for {density} must be between 0 and 1, got {ratio}"
                )));
            }
        }
        for key in self.index().keys() {
            for (table, fracs) in [("dm_fracs", &self.dm_fracs), ("vs_fracs", &self.vs_fracs)] {
                match lookup(fracs, key) {
                    Some(v) if v > 0.0 => {}
                    _ => {
                        return Err(BiogasError::Config(format!(
                            "{table} must be positive for {key}"
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}
