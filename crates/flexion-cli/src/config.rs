//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use flexion_ingest::IngestConfig;
use std::fs;
use std::path::Path;

/// Default configuration file looked up next to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "flexion.toml";

/// Load the pipeline configuration.
///
/// An explicitly given path must exist; the default path is optional and
/// falls back to built-in defaults when absent. The result is validated
/// before it is handed to the pipeline.
pub fn load_config(path: Option<&Path>) -> Result<IngestConfig> {
    let config = match path {
        Some(explicit) => parse_file(explicit)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                parse_file(default)?
            } else {
                IngestConfig::default()
            }
        }
    };

    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<IngestConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    IngestConfig::from_toml(&contents).map_err(CliError::Config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = load_config(Some(Path::new("/no/such/flexion.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_config_is_parsed_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flexion.toml");
        fs::write(&path, "batch_limit = 120\ndata_dir = \"catalog\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.batch_limit, 120);
        assert_eq!(config.data_dir, Path::new("catalog"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flexion.toml");
        fs::write(&path, "batch_limit = 0\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::Config(_))
        ));
    }
}
