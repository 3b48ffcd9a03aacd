use anyhow::{Context, Result};
use biogas_algo::substrate_inventory;
use biogas_cli::ParamArgs;
use biogas_core::Basis;
use biogas_io::{load_statistics_dir, write_inventory_csv};
use std::path::Path;

use crate::commands::util::resolve;

pub fn handle(stats: &Path, basis: &str, args: &ParamArgs, out: &Path) -> Result<()> {
    let basis: Basis = basis.parse()?;
    let params = resolve(args)?;
    let bundle = load_statistics_dir(stats)?;

    let inventory =
        substrate_inventory(&bundle, &params, basis).context("estimating substrate inventory")?;
    write_inventory_csv(&inventory, out)?;
    println!(
        "Wrote {} regions ({}) to {}",
        inventory.len(),
        basis,
        out.display()
    );
    Ok(())
}
