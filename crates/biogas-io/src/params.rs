//! Parameter files: YAML or JSON, every field optional.

use anyhow::{Context, Result};
use biogas_core::ParameterSet;
use std::fs;
use std::path::Path;

/// Load a parameter set, choosing the format by extension and falling back to
/// YAML then JSON. Missing fields keep their defaults.
pub fn load_parameters(path: &Path) -> Result<ParameterSet> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing parameter yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing parameter json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing parameter file"),
    }
}

/// Defaults, then the optional file, then `name=value` overrides in order.
/// The result is validated.
pub fn resolve_parameters<S: AsRef<str>>(
    path: Option<&Path>,
    overrides: &[S],
) -> Result<ParameterSet> {
    let mut params = match path {
        Some(path) => load_parameters(path)?,
        None => ParameterSet::default(),
    };
    params
        .validate()
        .context("validating parameter file")?;
    params
        .apply_overrides(overrides)
        .context("applying parameter overrides")?;
    Ok(params)
}

pub fn parameters_to_yaml(params: &ParameterSet) -> Result<String> {
    serde_yaml::to_string(params).context("serializing parameters to YAML")
}

pub fn write_parameters_yaml(params: &ParameterSet, path: &Path) -> Result<()> {
    let yaml = parameters_to_yaml(params)?;
    fs::write(path, yaml).with_context(|| format!("writing parameters to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use biogas_core::BiogasError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "removal_rate: 0.25").unwrap();
        writeln!(file, "p_min: 2.0").unwrap();

        let params = load_parameters(file.path()).unwrap();
        assert_eq!(params.removal_rate, 0.25);
        assert_eq!(params.p_min, 2.0);
        assert_eq!(params.d_max, ParameterSet::default().d_max);
        assert_eq!(params.taxonomy, ParameterSet::default().taxonomy);
    }

    #[test]
    fn unknown_extension_falls_back_to_json() {
        let mut file = NamedTempFile::with_suffix(".conf").unwrap();
        writeln!(file, r#"{{"cn_min": 12.0, "radius_km": 10.0}}"#).unwrap();

        let params = load_parameters(file.path()).unwrap();
        assert_eq!(params.cn_min, 12.0);
        assert_eq!(params.radius_km, 10.0);
    }

    #[test]
    fn written_yaml_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.yml");
        let params = ParameterSet::default().with_removal_rate(0.3).unwrap();
        write_parameters_yaml(&params, &path).unwrap();
        assert_eq!(load_parameters(&path).unwrap(), params);
    }

    #[test]
    fn overrides_apply_after_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "removal_rate: 0.25").unwrap();

        let params = resolve_parameters(Some(file.path()), &["removal_rate=0.1", "p_min=3"]).unwrap();
        assert_eq!(params.removal_rate, 0.1);
        assert_eq!(params.p_min, 3.0);
    }

    #[test]
    fn out_of_range_file_values_are_rejected() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "d_min: 0.5").unwrap();
        writeln!(file, "d_max: 0.1").unwrap();

        let err = resolve_parameters::<&str>(Some(file.path()), &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BiogasError>(),
            Some(BiogasError::Config(_))
        ));
    }

    #[test]
    fn unknown_override_is_a_config_error() {
        let err = resolve_parameters(None, &["speed=3"]).unwrap_err();
        assert!(format!("{err:#}").contains("unknown parameter 'speed'"));
    }
}
