//! FileVault Error Types

use thiserror::Error;

/// Result type alias for FileVault operations
pub type Result<T> = std::result::Result<T, Error>;

/// FileVault error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // Storage errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
