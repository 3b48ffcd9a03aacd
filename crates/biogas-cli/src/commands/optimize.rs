//! Per-row production maximization of an inventory file.

use anyhow::{bail, Context, Result};
use biogas_algo::{biogas_production, maximize_production_table};
use biogas_cli::ParamArgs;
use biogas_core::Basis;
use biogas_io::{read_inventory_csv, write_production_csv, ProductionRow};
use std::path::Path;
use tracing::info;

use crate::commands::util::{configure_threads, resolve};

pub fn handle(inventory_path: &Path, args: &ParamArgs, threads: &str, out: &Path) -> Result<()> {
    configure_threads(threads);
    let params = resolve(args)?;
    let inventory = read_inventory_csv(inventory_path)?;
    if inventory.basis != Basis::VolatileSolids {
        bail!(
            "yields are per Mg volatile solids; {} is on a {} basis",
            inventory_path.display(),
            inventory.basis
        );
    }

    let usable = maximize_production_table(&inventory.table, &params)
        .context("optimizing inventory rows")?;

    let mut rows = Vec::with_capacity(inventory.len());
    for (region, available) in inventory.table.rows() {
        let used = usable.row(region).cloned().unwrap_or_default();
        rows.push(ProductionRow {
            region: region.clone(),
            theoretical_mw: biogas_production(available, &params)?,
            constrained_mw: biogas_production(&used, &params)?,
            usable: used,
        });
    }

    let theoretical: f64 = rows.iter().map(|r| r.theoretical_mw).sum();
    let constrained: f64 = rows.iter().map(|r| r.constrained_mw).sum();
    info!(rows = rows.len(), theoretical, constrained, "optimization finished");

    write_production_csv(&rows, out)?;
    println!(
        "Optimized {} rows: {:.3} MW of {:.3} MW usable; wrote {}",
        rows.len(),
        constrained,
        theoretical,
        out.display()
    );
    Ok(())
}
