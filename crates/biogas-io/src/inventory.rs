//! Wide-format substrate inventory CSV.
//!
//! ```csv
//! region,basis,cropland/straw,glw_cattle/liquid,...
//! SE11,volatile-solids,1520.3,880.1,...
//! ```

use anyhow::{anyhow, bail, Context, Result};
use biogas_core::{Basis, RegionCode, SubstrateInventory, SubstrateKey, Table};
use std::path::Path;

pub fn write_inventory_csv(inventory: &SubstrateInventory, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    let keys: Vec<SubstrateKey> = inventory.table.columns().into_iter().collect();
    let mut header = vec!["region".to_string(), "basis".to_string()];
    header.extend(keys.iter().map(|k| k.to_string()));
    wtr.write_record(&header).context("writing CSV header")?;

    let basis = inventory.basis.as_str();
    for (region, row) in inventory.table.rows() {
        let mut record = vec![region.to_string(), basis.to_string()];
        // Rows of a finished inventory cover every column; blanks mark gaps.
        record.extend(
            keys.iter()
                .map(|k| row.get(k).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record).context("writing CSV record")?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn read_inventory_csv(path: &Path) -> Result<SubstrateInventory> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening inventory CSV: {}", path.display()))?;

    let headers = rdr.headers().context("reading inventory header")?.clone();
    if headers.get(0) != Some("region") || headers.get(1) != Some("basis") {
        bail!(
            "inventory {} must start with 'region,basis' columns",
            path.display()
        );
    }
    let keys = headers
        .iter()
        .skip(2)
        .map(|h| h.parse::<SubstrateKey>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing substrate columns of {}", path.display()))?;

    let mut basis: Option<Basis> = None;
    let mut table = Table::new();
    for result in rdr.records() {
        let record = result.context("reading inventory CSV record")?;
        let region = RegionCode::from(
            record
                .get(0)
                .ok_or_else(|| anyhow!("missing region column"))?,
        );
        let row_basis: Basis = record
            .get(1)
            .ok_or_else(|| anyhow!("missing basis column"))?
            .parse()
            .with_context(|| format!("parsing basis for {region}"))?;
        match basis {
            None => basis = Some(row_basis),
            Some(b) if b != row_basis => {
                bail!("inventory mixes bases {b} and {row_basis} (region {region})")
            }
            Some(_) => {}
        }
        for (key, cell) in keys.iter().zip(record.iter().skip(2)) {
            if cell.trim().is_empty() {
                continue;
            }
            let value: f64 = cell
                .trim()
                .parse()
                .with_context(|| format!("parsing {key} for {region}"))?;
            if !value.is_finite() || value < 0.0 {
                bail!("{key} for {region} must be finite and non-negative, got {value}");
            }
            table.insert(region.clone(), *key, value);
        }
    }

    Ok(SubstrateInventory::new(basis.unwrap_or_default(), table))
}
