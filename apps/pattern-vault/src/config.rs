//! # Configuration
//!
//! Layered settings for the CLI and HTTP server.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (`PATTERN_VAULT_*`)
//! 3. TOML file (`--config <path>` or `pattern-vault.toml` in the working directory)
//! 4. Compiled defaults
//!
//! ```toml
//! [store]
//! path = "patterns.db"
//! backend = "redb"     # redb | file | memory
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! cors_origins = "http://localhost:3000"
//! ```
//!
//! The API key is read from the environment only, never from a file.

use pattern_core::PatternError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pattern-vault.toml";

pub const DEFAULT_DATABASE: &str = "patterns.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

pub const ENV_DATABASE: &str = "PATTERN_VAULT_DATABASE";
pub const ENV_BACKEND: &str = "PATTERN_VAULT_BACKEND";
pub const ENV_API_KEY: &str = "PATTERN_VAULT_API_KEY";
pub const ENV_CORS_ORIGINS: &str = "PATTERN_VAULT_CORS_ORIGINS";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

impl From<ConfigError> for PatternError {
    fn from(e: ConfigError) -> Self {
        PatternError::InvalidInput(e.to_string())
    }
}

// =============================================================================
// BACKEND KIND
// =============================================================================

/// Which store the catalog runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// redb database file (ACID, persistent).
    #[default]
    Redb,
    /// Snapshot file rewritten after every change.
    File,
    /// Volatile, lost on exit.
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redb => "redb",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ValidationFailed {
                field: "backend".to_string(),
                message: format!("unknown backend '{}' (expected redb, file or memory)", other),
            }),
        }
    }
}

// =============================================================================
// FILE LAYER
// =============================================================================

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub path: Option<PathBuf>,
    pub backend: Option<String>,
}

/// `[server]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<String>,
}

/// Contents of a TOML config file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store: StoreSection,
    pub server: ServerSection,
}

impl FileConfig {
    /// Parse TOML text; `origin` names the source in error messages.
    pub fn from_toml(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }
}

// =============================================================================
// CLI LAYER
// =============================================================================

/// Values given on the command line. `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub backend: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub database: PathBuf,
    pub backend: BackendKind,
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub cors_origins: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            backend: BackendKind::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            cors_origins: None,
        }
    }
}

impl VaultConfig {
    /// Resolve configuration against the process environment.
    pub fn load(cli: &CliOverrides) -> Result<Self, ConfigError> {
        Self::load_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an injectable environment lookup.
    pub fn load_with<F>(cli: &CliOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &cli.config {
            Some(path) => Some(FileConfig::from_path(path)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Some(FileConfig::from_path(default_path)?)
                } else {
                    None
                }
            }
        };
        Self::resolve(file.unwrap_or_default(), cli, env)
    }

    /// Merge an already-parsed file layer with env and CLI layers.
    pub fn resolve<F>(file: FileConfig, cli: &CliOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let database = cli
            .database
            .clone()
            .or_else(|| env(ENV_DATABASE).map(PathBuf::from))
            .or(file.store.path)
            .unwrap_or(defaults.database);

        let backend = match cli
            .backend
            .clone()
            .or_else(|| env(ENV_BACKEND))
            .or(file.store.backend)
        {
            Some(name) => name.parse::<BackendKind>()?,
            None => defaults.backend,
        };

        let host = cli
            .host
            .clone()
            .or(file.server.host)
            .unwrap_or(defaults.host);
        if host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "server.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let port = cli.port.or(file.server.port).unwrap_or(defaults.port);

        Ok(Self {
            database,
            backend,
            host,
            port,
            api_key: env(ENV_API_KEY),
            cors_origins: env(ENV_CORS_ORIGINS).or(file.server.cors_origins),
        })
    }

    /// `host:port` for binding the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
