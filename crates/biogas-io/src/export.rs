//! Result writers for optimization runs and summary reports.

use anyhow::{Context, Result};
use biogas_core::{RegionCode, SubstrateKey, SubstrateVector};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Optimized substrate use of one inventory row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRow {
    pub region: RegionCode,
    /// Substrate amounts the constrained plant actually uses.
    pub usable: SubstrateVector,
    /// Production if every available substrate were digested, MW.
    pub theoretical_mw: f64,
    /// Production of the usable mix, MW.
    pub constrained_mw: f64,
}

/// Write `region,<substrate columns...>,theoretical_mw,constrained_mw`.
pub fn write_production_csv(rows: &[ProductionRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    let keys: BTreeSet<SubstrateKey> = rows.iter().flat_map(|r| r.usable.keys().copied()).collect();
    let mut header = vec!["region".to_string()];
    header.extend(keys.iter().map(|k| k.to_string()));
    header.push("theoretical_mw".to_string());
    header.push("constrained_mw".to_string());
    wtr.write_record(&header).context("writing CSV header")?;

    for row in rows {
        let mut record = vec![row.region.to_string()];
        record.extend(
            keys.iter()
                .map(|k| row.usable.get(k).copied().unwrap_or(0.0).to_string()),
        );
        record.push(row.theoretical_mw.to_string());
        record.push(row.constrained_mw.to_string());
        wtr.write_record(&record).context("writing CSV record")?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing result to JSON")?;
    fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use biogas_core::{Density, Substrate};

    #[test]
    fn production_csv_has_one_column_per_substrate() {
        let straw = SubstrateKey::new(Density::Cropland, Substrate::Straw);
        let slurry = SubstrateKey::new(Density::Pigs, Substrate::Liquid);
        let rows = vec![
            ProductionRow {
                region: RegionCode::from("SE11"),
                usable: [(straw, 10.0), (slurry, 0.0)].into_iter().collect(),
                theoretical_mw: 4.0,
                constrained_mw: 2.0,
            },
            ProductionRow {
                region: RegionCode::from("SE12"),
                usable: [(straw, 1.5)].into_iter().collect(),
                theoretical_mw: 0.5,
                constrained_mw: 0.0,
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("production.csv");
        write_production_csv(&rows, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "region,cropland/straw,glw_pigs/liquid,theoretical_mw,constrained_mw"
        );
        assert_eq!(lines[2], "SE12,1.5,0,0.5,0");
    }

    #[test]
    fn json_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&serde_json::json!({"overall_limit": 0.5}), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n"));
        assert!(written.contains("\"overall_limit\": 0.5"));
    }
}
