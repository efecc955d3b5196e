//! HTTP Server Configuration
//!
//! Layered in order: built-in defaults, optional JSON config file,
//! environment variables, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rest_api::parser::{DEFAULT_LIMIT, MAX_BATCH_SIZE, MAX_LIMIT};
use crate::rest_api::Limits;

/// Backing table name
pub const TABLE_NAME_ENV: &str = "TODO_TABLE_NAME";
pub const HOST_ENV: &str = "TODO_API_HOST";
pub const PORT_ENV: &str = "TODO_API_PORT";

/// Table used when `TODO_TABLE_NAME` is unset
pub const DEFAULT_TABLE_NAME: &str = "todos";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Backing table name (default: "todos")
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Page size when the caller gives no limit (default: 50)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest accepted `limit` (default: 1000)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Largest accepted bulk request (default: 25)
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_LIMIT
}

fn default_max_page_size() -> usize {
    MAX_LIMIT
}

fn default_max_batch_size() -> usize {
    MAX_BATCH_SIZE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            table_name: default_table_name(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay environment settings read through `lookup`. Empty values are
    /// treated as unset.
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(table) = get(TABLE_NAME_ENV) {
            self.table_name = table.trim().to_string();
        }
        if let Some(host) = get(HOST_ENV) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = get(PORT_ENV) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: PORT_ENV,
                value: port.clone(),
            })?;
        }
        Ok(self)
    }

    /// Check internal consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name cannot be empty".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be between 1 and max_page_size ({})",
                self.max_page_size
            )));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::Invalid("max_batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Paging and batch limits for the handlers
    pub fn limits(&self) -> Limits {
        Limits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            max_batch_size: self.max_batch_size,
        }
    }
}
