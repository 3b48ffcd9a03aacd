use anyhow::Result;
use biogas_cli::ParamArgs;
use biogas_io::{parameters_to_yaml, write_parameters_yaml};
use std::path::Path;

use crate::commands::util::resolve;

pub fn handle(args: &ParamArgs, out: Option<&Path>) -> Result<()> {
    let params = resolve(args)?;
    match out {
        Some(path) => {
            write_parameters_yaml(&params, path)?;
            println!("Wrote parameters to {}", path.display());
        }
        None => print!("{}", parameters_to_yaml(&params)?),
    }
    Ok(())
}
