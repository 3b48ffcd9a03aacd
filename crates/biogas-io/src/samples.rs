//! Density-raster sums from the zonal-statistics stage.
//!
//! Sample sums are long-format CSV, one row per disk and overlapped region:
//!
//! ```csv
//! density,x,y,r,region,sum
//! cropland,4450000,3350000,20,SE11,1234.5
//! ```
//!
//! Coordinates and radius may carry decimals (`4450000.0`); they are rounded
//! to whole metres and kilometres to key the disk.
//!
//! Region sums are JSON, `{"cropland": {"SE11": 5012.0, ...}, ...}`.

use anyhow::{bail, Context, Result};
use biogas_core::{Density, RegionCode, RegionSums, SamplePoint, SampleSums};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SampleSumRecord {
    density: Density,
    x: f64,
    y: f64,
    r: f64,
    region: String,
    sum: Option<f64>,
}

pub fn read_sample_sums(path: &Path) -> Result<SampleSums> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening sample sums CSV: {}", path.display()))?;

    let mut sums = SampleSums::new();
    for result in rdr.deserialize() {
        let record: SampleSumRecord =
            result.with_context(|| format!("parsing record in {}", path.display()))?;
        let Some(sum) = record.sum else {
            continue;
        };
        if !(record.x.is_finite() && record.y.is_finite() && record.r.is_finite())
            || record.r < 0.0
        {
            bail!(
                "invalid sample disk ({}, {}, r={}) in {}",
                record.x,
                record.y,
                record.r,
                path.display()
            );
        }
        let point = SamplePoint::new(
            record.x.round() as i64,
            record.y.round() as i64,
            record.r.round() as u32,
        );
        sums.entry(record.density)
            .or_default()
            .insert((point, RegionCode::from(record.region)), sum);
    }
    Ok(sums)
}

pub fn read_region_sums(path: &Path) -> Result<RegionSums> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading region sums '{}'", path.display()))?;
    serde_json::from_str(&data).context("parsing region sums json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn sample_sums_group_by_density() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "density,x,y,r,region,sum").unwrap();
        writeln!(file, "cropland,0,0,20,SE11,3.0").unwrap();
        writeln!(file, "glw_pigs,0,0,20,SE11,1.5").unwrap();
        writeln!(file, "glw_pigs,10000,0,20,SE12,").unwrap();

        let sums = read_sample_sums(file.path()).unwrap();
        assert_eq!(sums.len(), 2);
        let point = SamplePoint::new(0, 0, 20);
        assert_eq!(
            sums[&Density::Pigs].get(&(point, RegionCode::from("SE11"))),
            Some(&1.5)
        );
        assert_eq!(sums[&Density::Pigs].len(), 1);
    }

    #[test]
    fn decimal_coordinates_key_the_same_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "density,x,y,r,region,sum").unwrap();
        writeln!(file, "cropland,4450000.0,3350000.4,20.0,SE11,2.5").unwrap();
        writeln!(file, "glw_cattle,4450000,3350000,20,SE11,1.0").unwrap();

        let sums = read_sample_sums(file.path()).unwrap();
        let point = SamplePoint::new(4_450_000, 3_350_000, 20);
        let key = (point, RegionCode::from("SE11"));
        assert_eq!(sums[&Density::Cropland].get(&key), Some(&2.5));
        assert_eq!(sums[&Density::Cattle].get(&key), Some(&1.0));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "density,x,y,r,region,sum").unwrap();
        writeln!(file, "cropland,0,0,-5,SE11,1.0").unwrap();
        let err = read_sample_sums(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid sample disk"));
    }

    #[test]
    fn region_sums_parse_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"cropland": {{"SE11": 4.0, "SE12": 2.0}}}}"#).unwrap();

        let sums = read_region_sums(file.path()).unwrap();
        assert_eq!(sums[&Density::Cropland][&RegionCode::from("SE12")], 2.0);
    }

    #[test]
    fn unknown_density_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "density,x,y,r,region,sum").unwrap();
        writeln!(file, "glw_goats,0,0,20,SE11,3.0").unwrap();
        assert!(read_sample_sums(file.path()).is_err());
    }
}
