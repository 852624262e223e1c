//! # Payroll Configuration
//!
//! Where each backend lives and which one the console uses by default.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PAYROLL_BACKEND=database                                           │
//! │     PAYROLL_DB_PATH=/var/lib/payroll/payroll.db                        │
//! │     PAYROLL_FILE_PATH=/var/lib/payroll/payroll.jsonl                   │
//! │     PAYROLL_REST_URL=http://localhost:3000                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/payroll/payroll.toml (Linux)                             │
//! │     ~/Library/Application Support/com.payroll.payroll/payroll.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     in-memory backend, ./payroll.db, ./payroll.jsonl                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [service]
//! backend = "database"
//!
//! [database]
//! path = "payroll.db"
//! max_connections = 5
//!
//! [file]
//! path = "payroll.jsonl"
//!
//! [rest]
//! base_url = "http://localhost:3000"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{PayrollError, PayrollResult};
use payroll_core::BackendKind;
use payroll_db::DbConfig;

// =============================================================================
// Sections
// =============================================================================

/// Façade defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Backend used when a command doesn't name one.
    #[serde(default)]
    pub backend: BackendKind,
}

/// SQLite database location and pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("payroll.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// JSON Lines file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_file_path")]
    pub path: PathBuf,
}

fn default_file_path() -> PathBuf {
    PathBuf::from("payroll.jsonl")
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            path: default_file_path(),
        }
    }
}

/// JSON server endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestSettings {
    /// Server root; the collection lives at `{base_url}/employees`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for RestSettings {
    fn default() -> Self {
        RestSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete payroll configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollConfig {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub file: FileSettings,

    #[serde(default)]
    pub rest: RestSettings,
}

impl PayrollConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (payroll.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> PayrollResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading payroll config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    PayrollError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses configuration from a TOML string (no environment overrides).
    pub fn from_toml(contents: &str) -> PayrollResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PayrollResult<()> {
        let url = &self.rest.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PayrollError::Config(format!(
                "REST base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.rest.timeout_secs == 0 {
            return Err(PayrollError::Config(
                "rest.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(PayrollError::Config(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(backend) = std::env::var("PAYROLL_BACKEND") {
            match backend.parse() {
                Ok(kind) => {
                    debug!(backend = %backend, "Overriding backend from environment");
                    self.service.backend = kind;
                }
                Err(_) => warn!(backend = %backend, "Unknown backend in environment"),
            }
        }

        if let Ok(path) = std::env::var("PAYROLL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("PAYROLL_FILE_PATH") {
            self.file.path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("PAYROLL_REST_URL") {
            debug!(url = %url, "Overriding REST URL from environment");
            self.rest.base_url = url;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "payroll", "payroll")
            .map(|dirs| dirs.config_dir().join("payroll.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pool configuration for the database backend.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    /// REST request timeout.
    pub fn rest_timeout(&self) -> Duration {
        Duration::from_secs(self.rest.timeout_secs)
    }

    /// Default backend selector.
    pub fn backend(&self) -> BackendKind {
        self.service.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PayrollConfig::default();
        assert_eq!(config.backend(), BackendKind::InMemory);
        assert_eq!(config.database.path, PathBuf::from("payroll.db"));
        assert_eq!(config.rest.base_url, "http://localhost:3000");
        assert_eq!(config.rest_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PayrollConfig::from_toml(
            r#"
            [service]
            backend = "database"

            [rest]
            base_url = "https://payroll.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend(), BackendKind::Database);
        assert_eq!(config.rest.base_url, "https://payroll.example.com");
        assert_eq!(config.rest.timeout_secs, 10);
        assert_eq!(config.file.path, PathBuf::from("payroll.jsonl"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = PayrollConfig::default();

        config.rest.base_url = "ws://localhost:3000".into();
        assert!(config.validate().is_err());

        config.rest.base_url = "http://localhost:3000".into();
        config.rest.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.rest.timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = PayrollConfig::from_toml("[service\nbackend =").unwrap_err();
        assert!(matches!(err, PayrollError::Config(_)));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payroll.toml");
        std::fs::write(&path, "[file]\npath = \"/tmp/staff.jsonl\"\n").unwrap();

        let config = PayrollConfig::load(Some(path)).unwrap();
        assert_eq!(config.file.path, PathBuf::from("/tmp/staff.jsonl"));
    }

    #[test]
    fn test_db_config_carries_pool_size() {
        let mut config = PayrollConfig::default();
        config.database.max_connections = 2;

        let db = config.db_config();
        assert_eq!(db.max_connections, 2);
        assert!(!db.is_in_memory());
    }
}
