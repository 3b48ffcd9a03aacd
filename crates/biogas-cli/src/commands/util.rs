use anyhow::Result;
use biogas_cli::ParamArgs;
use biogas_core::ParameterSet;
use rayon::ThreadPoolBuilder;

pub fn configure_threads(spec: &str) {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        match spec.parse() {
            Ok(0) | Err(_) => num_cpus::get(),
            Ok(n) => n,
        }
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

pub fn parse_regions(spec: Option<&String>) -> Vec<String> {
    spec.map_or("", String::as_str)
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn resolve(args: &ParamArgs) -> Result<ParameterSet> {
    biogas_io::resolve_parameters(args.params.as_deref(), args.overrides.as_slice())
}
