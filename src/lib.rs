//! FileVault - Minimal Authenticated HTTP File Vault
//!
//! A small HTTP service that accepts file uploads, stores them in a single
//! flat directory, lists them with size and modification time, and serves
//! them back for download. Uploads and downloads are gated behind a shared
//! HTTP Basic credential pair loaded from the environment at startup.
//!
//! # Architecture
//!
//! The vault has no index or manifest: the storage directory listing is the
//! catalog. Three routes cover the whole surface:
//!
//! - `GET /` renders the catalog (unauthenticated)
//! - `POST /upload` stores a multipart file field (Basic auth)
//! - `GET /download?filename=...` streams a stored file back (Basic auth)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod storage;

pub use config::VaultConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{AppState, HttpServer};
    pub use crate::auth::Credentials;
    pub use crate::config::VaultConfig;
    pub use crate::error::{Error, Result};
    pub use crate::storage::StoredFile;
}
