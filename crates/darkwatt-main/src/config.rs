// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DarkWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Configuration for the daily tracking run

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main application configuration.
///
/// Loaded from a TOML file when one exists, otherwise built from defaults
/// with environment overrides. All values are explicit: nothing in the
/// tracking core reads the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Monitoring parameters
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Ledger storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Report output
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Daily reactor status page to ingest
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Flag plants whose longest unit streak exceeds this many days
    #[serde(default = "default_threshold_days")]
    pub threshold_days: u32,

    /// HTTP timeout for the status page fetch (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite ledger path; parent directories are created on open
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the JSON report is written
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

fn default_status_url() -> String {
    "https://www.nrc.gov/reading-rm/doc-collections/event-status/reactor-status/ps.html".to_owned()
}

fn default_threshold_days() -> u32 {
    40
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/unit_power.sqlite3")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("out/flagged.json")
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            threshold_days: default_threshold_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            storage: StorageConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (or `config.toml` in the working
    /// directory), falling back to defaults with environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = path.unwrap_or(Path::new("config.toml"));

        if candidate.exists() {
            let config_str = std::fs::read_to_string(candidate)
                .with_context(|| format!("Failed to read {}", candidate.display()))?;
            let config: AppConfig = toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse {}", candidate.display()))?;
            info!("Loaded configuration from {}", candidate.display());
            config.validate()?;
            return Ok(config);
        }

        if path.is_some() {
            anyhow::bail!("Config file not found: {}", candidate.display());
        }

        warn!("No configuration file found, using defaults with environment overrides");
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Build defaults with environment variable overrides.
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DARKWATT_STATUS_URL") {
            config.monitor.status_url = url;
        }
        if let Ok(threshold) = std::env::var("DARKWATT_THRESHOLD_DAYS")
            && let Ok(days) = threshold.parse::<u32>()
        {
            config.monitor.threshold_days = days;
        }
        if let Ok(db) = std::env::var("DARKWATT_DB") {
            config.storage.database_path = PathBuf::from(db);
        }
        if let Ok(out) = std::env::var("DARKWATT_REPORT_JSON") {
            config.output.report_path = PathBuf::from(out);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.status_url.is_empty() {
            anyhow::bail!("monitor.status_url cannot be empty");
        }
        if self.monitor.threshold_days == 0 {
            anyhow::bail!("monitor.threshold_days must be at least 1");
        }
        if self.monitor.request_timeout_secs == 0 {
            anyhow::bail!("monitor.request_timeout_secs must be at least 1");
        }
        if self.storage.database_path.as_os_str().is_empty() {
            anyhow::bail!("storage.database_path cannot be empty");
        }
        if self.output.report_path.as_os_str().is_empty() {
            anyhow::bail!("output.report_path cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.monitor.threshold_days, 40);
        assert_eq!(config.monitor.request_timeout_secs, 30);
        assert!(config.monitor.status_url.starts_with("https://www.nrc.gov/"));
        assert_eq!(config.storage.database_path, PathBuf::from("data/unit_power.sqlite3"));
        assert_eq!(config.output.report_path, PathBuf::from("out/flagged.json"));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig {
            monitor: MonitorConfig {
                status_url: "https://example.invalid/status.html".to_owned(),
                threshold_days: 21,
                request_timeout_secs: 10,
            },
            storage: StorageConfig {
                database_path: PathBuf::from("/var/lib/darkwatt/power.sqlite3"),
            },
            output: OutputConfig {
                report_path: PathBuf::from("/tmp/flagged.json"),
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(loaded.monitor.status_url, config.monitor.status_url);
        assert_eq!(loaded.monitor.threshold_days, 21);
        assert_eq!(loaded.storage.database_path, config.storage.database_path);
        assert_eq!(loaded.output.report_path, config.output.report_path);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let loaded: AppConfig = toml::from_str(
            r#"
            [monitor]
            threshold_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(loaded.monitor.threshold_days, 14);
        assert!(loaded.monitor.status_url.starts_with("https://www.nrc.gov/"));
        assert_eq!(loaded.output.report_path, PathBuf::from("out/flagged.json"));
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = AppConfig::default();
        config.monitor.threshold_days = 0;

        assert!(config.validate().is_err());
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("threshold_days")
        );
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = AppConfig::default();
        config.monitor.status_url = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [monitor]
            threshold_days = 7

            [storage]
            database_path = "ledger.sqlite3"
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.monitor.threshold_days, 7);
        assert_eq!(config.storage.database_path, PathBuf::from("ledger.sqlite3"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");

        assert!(AppConfig::load(Some(path.as_path())).is_err());
    }
}
