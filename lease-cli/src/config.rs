//! Configuration loading and parsing

use anyhow::{Context, Result};
use lease_ledger::store::DEFAULT_STORE_KEY;
use lease_ledger::LeaseConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub lease: LeaseConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// JSON document holding the entries
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Key the entries are stored under inside the document
    #[serde(default = "default_store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            key: default_store_key(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("lease-mileage.json")
}

fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .lease
        .validate()
        .with_context(|| format!("Invalid lease terms in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lease_ledger::PenaltyPolicy;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [lease]
            allowance = 30000
            penalty_rate = 0.25
            lease_start = "2024-03-01"
            policy = "simple"

            [store]
            path = "data/miles.json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.lease.allowance, 30_000);
        assert_eq!(config.lease.penalty_rate, 0.25);
        assert_eq!(
            config.lease.lease_start,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(config.lease.policy, PenaltyPolicy::Simple);
        assert_eq!(config.lease.lease_weeks, 156);
        assert_eq!(config.store.path, PathBuf::from("data/miles.json"));
        assert_eq!(config.store.key, DEFAULT_STORE_KEY);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.lease, LeaseConfig::default());
        assert_eq!(config.store.path, PathBuf::from("lease-mileage.json"));
    }

    #[test]
    fn test_load_config_rejects_bad_terms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[lease]\nlease_weeks = 0\n").unwrap();
        assert!(load_config(&path).is_err());

        fs::write(&path, "[lease]\nlease_weeks = 4000000000\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("lease_weeks must be at most"));
    }
}
