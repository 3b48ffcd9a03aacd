//! Substrate taxonomy: density families, management systems and substrates.
//!
//! A density family names the spatial distribution a substrate follows
//! (cropland for residues, a livestock grid for manure). Families partition
//! the substrates into disjoint groups, so a [`SubstrateKey`] is the pair
//! `(density, substrate)`.

use crate::error::{BiogasError, BiogasResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Density {
    #[serde(rename = "cropland")]
    Cropland,
    #[serde(rename = "glw_cattle")]
    Cattle,
    #[serde(rename = "glw_pigs")]
    Pigs,
    #[serde(rename = "glw_chickens")]
    Chickens,
}

impl Density {
    pub const LIVESTOCK: [Density; 3] = [Density::Cattle, Density::Pigs, Density::Chickens];

    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Cropland => "cropland",
            Density::Cattle => "glw_cattle",
            Density::Pigs => "glw_pigs",
            Density::Chickens => "glw_chickens",
        }
    }

    pub fn is_livestock(&self) -> bool {
        !matches!(self, Density::Cropland)
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = BiogasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cropland" => Ok(Density::Cropland),
            "glw_cattle" => Ok(Density::Cattle),
            "glw_pigs" => Ok(Density::Pigs),
            "glw_chickens" => Ok(Density::Chickens),
            other => Err(BiogasError::Parse(format!("unknown density '{other}'"))),
        }
    }
}

/// Simplified manure management classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Management {
    Liquid,
    Solid,
    /// Pasture and daily spread; cannot be collected.
    Unavailable,
}

impl Management {
    pub const ALL: [Management; 3] = [Management::Liquid, Management::Solid, Management::Unavailable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Management::Liquid => "liquid",
            Management::Solid => "solid",
            Management::Unavailable => "unavailable",
        }
    }

    /// Substrate produced by collectable manure, `None` for unavailable.
    pub fn substrate(&self) -> Option<Substrate> {
        match self {
            Management::Liquid => Some(Substrate::Liquid),
            Management::Solid => Some(Substrate::Solid),
            Management::Unavailable => None,
        }
    }
}

impl fmt::Display for Management {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Management {
    type Err = BiogasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liquid" => Ok(Management::Liquid),
            "solid" => Ok(Management::Solid),
            "unavailable" => Ok(Management::Unavailable),
            other => Err(BiogasError::Parse(format!("unknown management system '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Substrate {
    #[serde(rename = "liquid")]
    Liquid,
    #[serde(rename = "solid")]
    Solid,
    #[serde(rename = "straw")]
    Straw,
    #[serde(rename = "stover")]
    Stover,
    #[serde(rename = "sunflower stalks")]
    SunflowerStalks,
    #[serde(rename = "beet tops")]
    BeetTops,
}

impl Substrate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Substrate::Liquid => "liquid",
            Substrate::Solid => "solid",
            Substrate::Straw => "straw",
            Substrate::Stover => "stover",
            Substrate::SunflowerStalks => "sunflower stalks",
            Substrate::BeetTops => "beet tops",
        }
    }

    pub fn is_residue(&self) -> bool {
        !matches!(self, Substrate::Liquid | Substrate::Solid)
    }
}

impl fmt::Display for Substrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Substrate {
    type Err = BiogasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liquid" => Ok(Substrate::Liquid),
            "solid" => Ok(Substrate::Solid),
            "straw" => Ok(Substrate::Straw),
            "stover" => Ok(Substrate::Stover),
            "sunflower stalks" => Ok(Substrate::SunflowerStalks),
            "beet tops" => Ok(Substrate::BeetTops),
            other => Err(BiogasError::Parse(format!("unknown substrate '{other}'"))),
        }
    }
}

/// Column key of the substrate inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubstrateKey {
    pub density: Density,
    pub substrate: Substrate,
}

impl SubstrateKey {
    pub fn new(density: Density, substrate: Substrate) -> Self {
        Self { density, substrate }
    }
}

impl fmt::Display for SubstrateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.density, self.substrate)
    }
}

impl FromStr for SubstrateKey {
    type Err = BiogasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (density, substrate) = s
            .split_once('/')
            .ok_or_else(|| BiogasError::Parse(format!("expected 'density/substrate', got '{s}'")))?;
        Ok(Self::new(density.trim().parse()?, substrate.trim().parse()?))
    }
}

/// Mass basis of an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Basis {
    /// Mg volatile solids per year.
    #[default]
    VolatileSolids,
    /// Mg dry matter per year.
    DryMatter,
}

impl Basis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::VolatileSolids => "volatile-solids",
            Basis::DryMatter => "dry-matter",
        }
    }
}

impl FromStr for Basis {
    type Err = BiogasError;

    fn from_str(s: &str) -> BiogasResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vs" | "volatile-solids" => Ok(Basis::VolatileSolids),
            "dm" | "dry-matter" => Ok(Basis::DryMatter),
            _ => Err(BiogasError::InvalidBasisArgument(s.to_string())),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
