//! TOML-based configuration for Lexis
//!
//! Settings live in `lexis.toml`. Every section and field is optional, so a
//! missing file simply means "use the defaults". Selected values can be
//! overridden from the environment (a `.env` file is honoured):
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LEXIS_API_BASE_URL` | `api.base_url` |
//! | `LEXIS_TIMEOUT_SECS` | `api.timeout_secs` |
//! | `LEXIS_STORAGE_PATH` | `storage.path` |

use crate::session::{FileStore, MemoryStore, Session};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lexis.toml";

pub const ENV_API_BASE_URL: &str = "LEXIS_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "LEXIS_TIMEOUT_SECS";
pub const ENV_STORAGE_PATH: &str = "LEXIS_STORAGE_PATH";

/// Root configuration structure loaded from lexis.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexisConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings for `lexis mock-server`
    #[serde(default)]
    pub mock: MockConfig,
}

// ============= API Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("lexis/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// ============= Storage Configuration =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Credential file, used by the `file` backend
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub backend: StorageBackend,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".lexis/credentials.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            backend: StorageBackend::default(),
        }
    }
}

impl StorageConfig {
    /// Open a session over the configured backend.
    pub fn open_session(&self) -> crate::types::Result<Session> {
        match self.backend {
            StorageBackend::File => {
                let store = FileStore::open(&self.path)?;
                Ok(Session::new(Arc::new(store)))
            }
            StorageBackend::Memory => Ok(Session::new(Arc::new(MemoryStore::new()))),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Mock Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_mock_host")]
    pub host: String,

    #[serde(default = "default_mock_port")]
    pub port: u16,

    /// Lifetime of issued access tokens, in seconds
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
}

fn default_mock_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mock_port() -> u16 {
    8000
}

fn default_access_ttl_secs() -> u64 {
    300
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: default_mock_host(),
            port: default_mock_port(),
            access_ttl_secs: default_access_ttl_secs(),
        }
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for environment variable '{0}': {1}")]
    InvalidEnvVar(String, String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for crate::types::ClientError {
    fn from(err: ConfigError) -> Self {
        crate::types::ClientError::Config(err.to_string())
    }
}

impl LexisConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error. The result is validated but not yet merged with
    /// the environment, see [`LexisConfig::load_with_env`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: LexisConfig = toml::from_str(&content)?;
            debug!(path = %path.display(), "Loaded configuration");
            config
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            LexisConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load `.env`, then the file, then apply `LEXIS_*` overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded environment file");
        }

        let mut config = Self::load(path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = lookup(ENV_API_BASE_URL) {
            info!(base_url = %base_url, "API base URL overridden from environment");
            self.api.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidEnvVar(ENV_TIMEOUT_SECS.to_string(), raw.clone())
            })?;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage.path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scheme = self
            .api
            .base_url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "api.base_url must be an http(s) URL, got '{}'",
                    self.api.base_url
                )))
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::File
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "storage.path must not be empty for the file backend".to_string(),
            ));
        }

        if self.mock.access_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "mock.access_ttl_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LexisConfig::load(dir.path().join("lexis.toml")).unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api/");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, PathBuf::from(".lexis/credentials.json"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.mock.port, 8000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lexis.toml");
        fs::write(
            &path,
            r#"
[api]
base_url = "https://lexis.example.com/api/"

[logging]
format = "json"

[storage]
backend = "memory"
"#,
        )
        .unwrap();

        let config = LexisConfig::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://lexis.example.com/api/");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lexis.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(matches!(
            LexisConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_scheme_and_zero_timeout() {
        let mut config = LexisConfig::default();
        config.api.base_url = "ftp://example.com/".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = LexisConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LexisConfig::default();
        config
            .apply_env_overrides(lookup(&[
                (ENV_API_BASE_URL, "http://10.0.0.5:9000/api/"),
                (ENV_TIMEOUT_SECS, " 30 "),
                (ENV_STORAGE_PATH, "/tmp/creds.json"),
            ]))
            .unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api/");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/creds.json"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = LexisConfig::default();
        config
            .apply_env_overrides(lookup(&[(ENV_API_BASE_URL, "  ")]))
            .unwrap();
        assert_eq!(config.api.base_url, default_base_url());
    }

    #[test]
    fn test_bad_timeout_env_is_an_error() {
        let mut config = LexisConfig::default();
        let err = config
            .apply_env_overrides(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_open_session_memory_backend() {
        let storage = StorageConfig {
            path: PathBuf::new(),
            backend: StorageBackend::Memory,
        };
        let session = storage.open_session().unwrap();
        assert!(!session.is_authenticated());
    }
}
