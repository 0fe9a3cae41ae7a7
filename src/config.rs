//! FileVault Configuration
//!
//! TOML-based configuration for the vault server. Every field carries a
//! default, so a missing configuration file means "run with defaults".
//! Credentials are deliberately not part of the file; they are loaded from
//! the environment once at startup (see [`crate::auth::Credentials`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main FileVault configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaultConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the stored files
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Maximum accepted upload size in MiB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_upload_mb() -> u64 {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: VaultConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(crate::Error::Config(
                "server.bind_address cannot be empty".into(),
            ));
        }

        if self.storage.max_upload_mb == 0 {
            return Err(crate::Error::Config(
                "storage.max_upload_mb must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Get the vault root directory
    pub fn vault_root(&self) -> &PathBuf {
        &self.storage.root
    }

    /// Get the maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        (self.storage.max_upload_mb as usize) * 1024 * 1024
    }
}
