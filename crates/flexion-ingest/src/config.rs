//! Configuration for the ingestion pipeline

use flexion_domain::traits::PROVIDER_BATCH_CAP;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned for source files in all-files mode
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path of the document-store database
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Maximum operations per commit; the provider cap minus a safety margin
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    /// File extensions considered source files
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

impl IngestConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_limit == 0 {
            return Err("batch_limit must be greater than 0".to_string());
        }
        if self.batch_limit > PROVIDER_BATCH_CAP {
            return Err(format!(
                "batch_limit cannot exceed the provider limit of {}",
                PROVIDER_BATCH_CAP
            ));
        }
        if self.source_extensions.is_empty() {
            return Err("source_extensions cannot be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for IngestConfig {
    /// Defaults matching the provider's documented limits
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_path: default_store_path(),
            batch_limit: default_batch_limit(),
            source_extensions: default_source_extensions(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_store_path() -> PathBuf {
    PathBuf::from("flexion.db")
}

fn default_batch_limit() -> usize {
    // provider cap 500, with a 100-op safety margin
    400
}

fn default_source_extensions() -> Vec<String> {
    vec!["ts".to_string(), "js".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_limit, 400);
    }

    #[test]
    fn test_zero_batch_limit_rejected() {
        let mut config = IngestConfig::default();
        config.batch_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_limit_over_provider_cap_rejected() {
        let mut config = IngestConfig::default();
        config.batch_limit = PROVIDER_BATCH_CAP + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_extension_list_rejected() {
        let mut config = IngestConfig::default();
        config.source_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = IngestConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = IngestConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.batch_limit, parsed.batch_limit);
        assert_eq!(config.source_extensions, parsed.source_extensions);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = IngestConfig::from_toml("batch_limit = 250\n").unwrap();
        assert_eq!(parsed.batch_limit, 250);
        assert_eq!(parsed.data_dir, PathBuf::from("data"));
    }
}
