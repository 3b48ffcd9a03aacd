//! National inventory reports to per-livestock manure shares.

use anyhow::{Context, Result};
use biogas_algo::{apply_report_replacements, collect_management_shares, screen_management_report};
use biogas_cli::ParamArgs;
use biogas_io::{read_management_reports, write_shares_csv};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::commands::util::resolve;

pub fn handle(reports_path: &Path, args: &ParamArgs, out: &Path) -> Result<()> {
    let params = resolve(args)?;
    let taxonomy = &params.taxonomy;

    let reports = read_management_reports(reports_path)?;
    let mut screened = BTreeMap::new();
    for ((country, year), report) in &reports {
        let shares = screen_management_report(report, taxonomy)
            .with_context(|| format!("screening management report {country} {year}"))?;
        screened.insert((country.clone(), *year), shares);
    }
    apply_report_replacements(&mut screened, &taxonomy.manure_report_replacements);
    info!(reports = screened.len(), "screened management reports");

    let shares = collect_management_shares(&screened);
    write_shares_csv(&shares, out)?;
    println!(
        "Wrote {} share records from {} reports to {}",
        shares.cells().count(),
        screened.len(),
        out.display()
    );
    Ok(())
}
