//! Application configuration
//!
//! Loaded from an optional TOML file; every section and field falls back
//! to its default, so an empty file is a valid configuration. CLI flags
//! and environment variables are applied on top by the binary.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use ixp_artifact::ConfigValidator;
use ixp_orchestrator::OrchestratorConfig;
use ixp_store::StorageConfig;
use serde::{Deserialize, Serialize};

/// Default request body cap: 50 MiB
pub const DEFAULT_BODY_LIMIT: u64 = 50 * 1024 * 1024;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid listen address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub validation: ValidationConfig,
    pub orchestrator: OrchestratorConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen host or address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Maximum request body size in bytes
    pub body_limit_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Validation engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Accept arrays for `peering_lan` and `route_servers`
    pub allow_array_containers: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_array_containers: true,
        }
    }
}

impl ValidationConfig {
    #[inline]
    #[must_use]
    pub fn validator(&self) -> ConfigValidator {
        ConfigValidator::new().with_array_containers(self.allow_array_containers)
    }
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or mistyped fields
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from a file, or defaults when no file is given
    ///
    /// # Errors
    /// [`ConfigError::Read`] or [`ConfigError::Parse`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// With storage directories
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// With listen port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// With orchestrator settings
    #[inline]
    #[must_use]
    pub fn with_orchestrator(mut self, orchestrator: OrchestratorConfig) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// Resolve the listen address
    ///
    /// # Errors
    /// [`ConfigError::InvalidAddress`] if the host does not resolve
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            addr: format!("{}:{}", self.server.host, self.server.port),
            reason,
        };
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("host resolved to no address".to_string()))
    }
}
