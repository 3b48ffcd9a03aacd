use anyhow::{Context, Result};
use biogas_algo::{sample_substrates, substrate_inventory, PotentialReport, SampleFractions};
use biogas_cli::ParamArgs;
use biogas_core::{Basis, RegionCode};
use biogas_io::{load_statistics_dir, read_region_sums, read_sample_sums, write_json};
use std::path::Path;
use tracing::info;

use crate::commands::util::{configure_threads, parse_regions, resolve};

pub struct PotentialInputs<'a> {
    pub stats: &'a Path,
    pub sample_sums: &'a Path,
    pub region_sums: &'a Path,
    pub regions: Option<&'a String>,
}

pub fn handle(
    inputs: PotentialInputs<'_>,
    args: &ParamArgs,
    threads: &str,
    out: Option<&Path>,
) -> Result<()> {
    configure_threads(threads);
    let params = resolve(args)?;
    let bundle = load_statistics_dir(inputs.stats)?;
    let inventory = substrate_inventory(&bundle, &params, Basis::VolatileSolids)
        .context("estimating substrate inventory")?;

    let fractions = SampleFractions::from_sums(
        &read_sample_sums(inputs.sample_sums)?,
        &read_region_sums(inputs.region_sums)?,
    );
    let samples = sample_substrates(&inventory, &fractions);

    let listed = parse_regions(inputs.regions);
    let regions: Vec<RegionCode> = if listed.is_empty() {
        params
            .taxonomy
            .region_selection
            .included_regions(&bundle.hierarchy)
            .context("selecting regions")?
            .into_iter()
            .collect()
    } else {
        listed.into_iter().map(RegionCode::from).collect()
    };
    info!(regions = regions.len(), samples = samples.len(), "computing potential");

    let report = PotentialReport::compute(&inventory, &regions, &samples, &params)
        .context("computing potential")?;
    match out {
        Some(path) => {
            write_json(&report, path)?;
            println!("Wrote potential report to {}", path.display());
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing potential report")?
        ),
    }
    Ok(())
}
