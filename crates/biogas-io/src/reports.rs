//! National inventory manure-management reports.
//!
//! Long format, one row per reported cell:
//!
//! ```csv
//! country,year,category,system,value
//! SE,2010,Dairy Cattle,Liquid system,62.4
//! SE,2010,Dairy Cattle,Solid storage,NO
//! ```
//!
//! Values are percent allocations. Notation keys (`NO`, `NE`, `IE`, `NA`, ...)
//! and other non-numeric cells count as 0, and a decimal comma is accepted.
//! Rows repeating a `(country, year, category, system)` cell, as reports split
//! by climate region do, are summed.

use anyhow::{Context, Result};
use biogas_core::{RegionCode, Table};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Allocation percentages per `(country, year)`: animal category × system.
pub type ReportSet = BTreeMap<(RegionCode, i32), Table<String, String>>;

#[derive(Debug, Deserialize)]
struct ReportRecord {
    country: String,
    year: i32,
    category: String,
    system: String,
    value: String,
}

/// Parse a reported cell; anything that is not a number is 0.
pub fn parse_report_value(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

pub fn read_management_reports(path: &Path) -> Result<ReportSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening management report CSV: {}", path.display()))?;

    let mut cells: BTreeMap<(RegionCode, i32), BTreeMap<(String, String), f64>> = BTreeMap::new();
    let mut notation = 0usize;
    for result in rdr.deserialize() {
        let record: ReportRecord =
            result.with_context(|| format!("parsing record in {}", path.display()))?;
        let value = parse_report_value(&record.value);
        if value == 0.0 && record.value.trim().parse::<f64>().is_err() {
            notation += 1;
        }
        *cells
            .entry((RegionCode::from(record.country), record.year))
            .or_default()
            .entry((record.category, record.system))
            .or_insert(0.0) += value;
    }

    debug!(
        path = %path.display(),
        reports = cells.len(),
        notation_keys = notation,
        "loaded management reports"
    );

    Ok(cells
        .into_iter()
        .map(|(report, values)| {
            let table = values
                .into_iter()
                .map(|((category, system), value)| (category, system, value))
                .collect();
            (report, table)
        })
        .collect())
}
