use anyhow::Result;
use biogas_cli::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::potential::PotentialInputs;

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Params { params, out } => commands::params::handle(params, out.as_deref()),
        Commands::Shares {
            reports,
            params,
            out,
        } => commands::shares::handle(reports, params, out),
        Commands::Substrates {
            stats,
            basis,
            params,
            out,
        } => commands::substrates::handle(stats, basis, params, out),
        Commands::Optimize {
            inventory,
            params,
            threads,
            out,
        } => commands::optimize::handle(inventory, params, threads, out),
        Commands::Potential {
            stats,
            sample_sums,
            region_sums,
            regions,
            params,
            threads,
            out,
        } => commands::potential::handle(
            PotentialInputs {
                stats,
                sample_sums,
                region_sums,
                regions: regions.as_ref(),
            },
            params,
            threads,
            out.as_deref(),
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
