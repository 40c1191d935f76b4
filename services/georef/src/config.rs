//! Alignment configuration loading.
//!
//! An optional YAML file provides the base configuration; `GEOREF_*`
//! environment variables are applied on top of it.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use grid_alignment::AlignmentConfig;
use tracing::{debug, info};

/// Load the alignment configuration from `path` (if any) and the environment.
pub fn load_config(path: Option<&Path>) -> Result<AlignmentConfig> {
    let base = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            info!(path = %path.display(), "Loaded alignment config");
            config
        }
        None => AlignmentConfig::default(),
    };

    let config = base.with_env_overrides();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid alignment config: {}", e))?;

    debug!(?config, "Effective alignment config");
    Ok(config)
}

/// Parse a YAML document; omitted keys keep their defaults.
pub fn parse_config(content: &str) -> Result<AlignmentConfig> {
    // An empty document deserializes as unit, not as a map
    if content.trim().is_empty() {
        return Ok(AlignmentConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml() {
        let config = parse_config(
            r#"
row_dim: y_index
col_dim: x_index
projection:
  standard_parallel_1: 33.0
  standard_parallel_2: 45.0
  latitude_of_origin: 23.0
  central_meridian: -96.0
  earth_radius: 6370000.0
"#,
        )
        .unwrap();

        assert_eq!(config.row_dim, "y_index");
        assert_eq!(config.col_dim, "x_index");
        assert_eq!(config.projection.central_meridian, -96.0);
        assert_eq!(config.template_x_var, "x");
        assert_eq!(config.resolution, 1000.0);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(parse_config("\n").unwrap(), AlignmentConfig::default());
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(parse_config("resolution: fine").is_err());
    }

    #[test]
    fn test_invalid_file_config_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "row_dim: west_east").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("row_dim and col_dim must differ"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/georef.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
