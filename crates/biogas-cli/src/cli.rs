use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Biogas substrate accounting and production potential", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

/// Parameter file and scalar overrides shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Parameter file (YAML or JSON); defaults are used for missing fields
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Override a scalar parameter, e.g. `--set removal_rate=0.2`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print or write the effective parameter set as YAML
    Params {
        #[command(flatten)]
        params: ParamArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Screen national management reports into manure shares
    Shares {
        /// Long-format report CSV (country,year,category,system,value)
        #[arg(long)]
        reports: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Output shares CSV (region,animal,management,year,value)
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Estimate the regional substrate inventory from staged statistics
    Substrates {
        /// Staged statistics directory
        #[arg(long)]
        stats: PathBuf,

        /// Mass basis: vs (volatile solids) or dm (dry matter)
        #[arg(long, default_value = "vs")]
        basis: String,

        #[command(flatten)]
        params: ParamArgs,

        /// Output inventory CSV
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Maximize production of every inventory row under the blend constraints
    Optimize {
        /// Inventory CSV written by `substrates`
        #[arg(long)]
        inventory: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Number of threads (0 or "auto" for all cores)
        #[arg(long, default_value = "auto")]
        threads: String,

        /// Output CSV of usable substrates and production
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Overall limit and constrained potential of a set of regions
    Potential {
        /// Staged statistics directory
        #[arg(long)]
        stats: PathBuf,

        /// Sample sums CSV (density,x,y,r,region,sum)
        #[arg(long)]
        sample_sums: PathBuf,

        /// Region sums JSON ({density: {region: sum}})
        #[arg(long)]
        region_sums: PathBuf,

        /// Comma-separated regions; the configured region selection if omitted
        #[arg(long)]
        regions: Option<String>,

        #[command(flatten)]
        params: ParamArgs,

        /// Number of threads (0 or "auto" for all cores)
        #[arg(long, default_value = "auto")]
        threads: String,

        /// Write the report JSON to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
