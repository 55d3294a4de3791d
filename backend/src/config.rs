//! # Application Configuration
//!
//! Settings are read from an optional YAML file, then selected values can be
//! overridden from the environment:
//!
//! ```yaml
//! data_directory: "/srv/mice"
//! bind_address: "0.0.0.0:3000"
//! session_timeout_secs: 120
//! session_poll_interval_secs: 5
//! ```
//!
//! The file is `$BREEDING_MANAGER_CONFIG` if set, otherwise
//! `breeding_manager.yaml` in the working directory. A missing file means
//! defaults. `BREEDING_MANAGER_DATA_DIR` and `BREEDING_MANAGER_BIND` win over
//! the file.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::session_service::DEFAULT_SESSION_TIMEOUT_SECS;
use crate::storage::csv::CsvConnection;

pub const CONFIG_PATH_ENV: &str = "BREEDING_MANAGER_CONFIG";
pub const DATA_DIR_ENV: &str = "BREEDING_MANAGER_DATA_DIR";
pub const BIND_ENV: &str = "BREEDING_MANAGER_BIND";
pub const DEFAULT_CONFIG_FILE: &str = "breeding_manager.yaml";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the data files live; `~/Documents/Mice Breeding Manager` when unset
    pub data_directory: Option<PathBuf>,
    pub bind_address: String,
    /// Session lifetime measured from login
    pub session_timeout_secs: u64,
    /// How often expired sessions are swept
    pub session_poll_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            session_poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// Load from the configured file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(BIND_ENV).ok(),
        );
        Ok(config)
    }

    /// Parse a YAML config file. Missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, data_directory: Option<String>, bind_address: Option<String>) {
        if let Some(dir) = data_directory.filter(|d| !d.trim().is_empty()) {
            self.data_directory = Some(PathBuf::from(dir));
        }
        if let Some(bind) = bind_address.filter(|b| !b.trim().is_empty()) {
            self.bind_address = bind;
        }
    }

    pub fn resolved_data_directory(&self) -> Result<PathBuf> {
        match &self.data_directory {
            Some(dir) => Ok(dir.clone()),
            None => CsvConnection::default_data_directory(),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Never zero, so the sweeper's interval timer stays valid
    pub fn session_poll_interval(&self) -> Duration {
        Duration::from_secs(self.session_poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.session_timeout(), Duration::from_secs(120));
        assert_eq!(config.session_poll_interval(), Duration::from_secs(5));
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = AppConfig::from_file(&temp_dir.path().join("absent.yaml"))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("breeding_manager.yaml");
        fs::write(&path, "data_directory: /srv/mice\nsession_timeout_secs: 600\n")?;

        let config = AppConfig::from_file(&path)?;
        assert_eq!(config.data_directory, Some(PathBuf::from("/srv/mice")));
        assert_eq!(config.session_timeout_secs, 600);
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("breeding_manager.yaml");
        fs::write(&path, "session_timeout_secs: [not, a, number]\n")?;

        assert!(AppConfig::from_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("/tmp/lab".to_string()), Some("0.0.0.0:8080".to_string()));
        assert_eq!(config.resolved_data_directory().unwrap(), PathBuf::from("/tmp/lab"));
        assert_eq!(config.socket_addr().unwrap().port(), 8080);

        config.apply_overrides(Some("  ".to_string()), None);
        assert_eq!(config.data_directory, Some(PathBuf::from("/tmp/lab")));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = AppConfig {
            session_poll_interval_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.session_poll_interval(), Duration::from_secs(1));
    }
}
