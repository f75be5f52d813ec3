//! # Application Configuration
//!
//! Configuration for one device running Kasir POS.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     KASIR_DB_PATH=/var/lib/kasir/kasir.db                               │
//! │     KASIR_REPLICATION_ENABLED=false                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/kasir-pos/kasir.toml (Linux)                              │
//! │     ~/Library/Application Support/id.kasir.kasir-pos/kasir.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     Database and backup next to each other in the platform data dir     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kasir.toml
//! [storage]
//! database_path = "/var/lib/kasir/kasir.db"
//! backup_path = "/var/lib/kasir/kasir_state_backup.json"
//!
//! [replication]
//! enabled = true
//! capacity = 16
//!
//! [remote]
//! enabled = false  # reference configuration: no remote mirror
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("config file unreadable: {0}")]
    Read(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("config file invalid: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Where the durable store and the backup mirror live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path to the SQLite snapshot database.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Path to the backup mirror JSON file.
    #[serde(default = "default_backup_path")]
    pub backup_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            backup_path: default_backup_path(),
        }
    }
}

/// Same-device replication between open sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationSettings {
    /// When false, sessions run on the no-op bus and do not see each
    /// other's commits. Data correctness within a session is unaffected.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Broadcast frames retained per receiver before older frames drop.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ReplicationSettings {
    fn default() -> Self {
        ReplicationSettings {
            enabled: true,
            capacity: default_capacity(),
        }
    }
}

/// The optional remote state mirror.
///
/// Off in the reference configuration; when off, nothing network-facing
/// is wired at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Feature flag for mirroring state to a remote database.
    #[serde(default)]
    pub enabled: bool,

    /// Endpoint of the remote mirror. Required only when enabled.
    #[serde(default)]
    pub url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_capacity() -> usize {
    kasir_sync::DEFAULT_CAPACITY
}

fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("id", "kasir", "kasir-pos")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_database_path() -> PathBuf {
    data_dir().join("kasir.db")
}

fn default_backup_path() -> PathBuf {
    data_dir().join("kasir_state_backup.json")
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage paths.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Replication bus settings.
    #[serde(default)]
    pub replication: ReplicationSettings,

    /// Remote mirror feature flag (default off).
    #[serde(default)]
    pub remote: RemoteSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`kasir.toml`)
    /// 3. `KASIR_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replication.enabled && self.replication.capacity == 0 {
            return Err(ConfigError::Invalid(
                "replication.capacity must be greater than 0".into(),
            ));
        }
        if self.remote.enabled && self.remote.url.is_none() {
            return Err(ConfigError::Invalid(
                "remote.enabled requires remote.url".into(),
            ));
        }
        Ok(())
    }

    /// Applies `KASIR_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("KASIR_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("KASIR_BACKUP_PATH") {
            self.storage.backup_path = PathBuf::from(path);
        }
        if let Ok(enabled) = std::env::var("KASIR_REPLICATION_ENABLED") {
            if let Ok(parsed) = enabled.parse::<bool>() {
                self.replication.enabled = parsed;
            }
        }
        if let Ok(url) = std::env::var("KASIR_REMOTE_URL") {
            self.remote.url = Some(url);
        }
        if let Ok(enabled) = std::env::var("KASIR_REMOTE_ENABLED") {
            if let Ok(parsed) = enabled.parse::<bool>() {
                self.remote.enabled = parsed;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "kasir", "kasir-pos")
            .map(|dirs| dirs.config_dir().join("kasir.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.replication.enabled);
        assert_eq!(config.replication.capacity, kasir_sync::DEFAULT_CAPACITY);
        assert!(!config.remote.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            database_path = "/tmp/till.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/till.db"));
        assert_eq!(config.storage.backup_path, default_backup_path());
        assert!(config.replication.enabled);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kasir.toml");
        std::fs::write(
            &path,
            r#"
            [replication]
            enabled = false

            [remote]
            enabled = false
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(path)).unwrap();
        assert!(!config.replication.enabled);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kasir.toml");
        std::fs::write(&path, "storage = 3").unwrap();

        assert!(matches!(
            AppConfig::load(Some(path)).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_remote_enabled_requires_url() {
        let mut config = AppConfig::default();
        config.remote.enabled = true;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));

        config.remote.url = Some("https://mirror.example".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = AppConfig::default();
        config.replication.capacity = 0;
        assert!(config.validate().is_err());

        // A zero capacity is fine once replication itself is off.
        config.replication.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[replication]"));
        let back: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.replication.capacity, config.replication.capacity);
    }
}
