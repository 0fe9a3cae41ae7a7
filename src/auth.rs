//! HTTP Basic authentication
//!
//! A single shared username/password pair protects uploads and downloads.
//! The pair is read from the environment once at startup and passed by
//! reference into the request path; nothing consults the environment after
//! that. A missing or empty credential is a startup error rather than an
//! open door.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Environment variable holding the vault username
pub const USERNAME_VAR: &str = "FV_USERNAME";
/// Environment variable holding the vault password
pub const PASSWORD_VAR: &str = "FV_PASSWORD";

/// Shared vault credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Load credentials from `FV_USERNAME` / `FV_PASSWORD`.
    ///
    /// Fails when either variable is unset or empty, so the vault never
    /// starts accepting empty-string credentials.
    pub fn from_env() -> crate::Result<Self> {
        let username = require_var(USERNAME_VAR)?;
        let password = require_var(PASSWORD_VAR)?;
        Ok(Self { username, password })
    }
}

fn require_var(name: &str) -> crate::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(crate::Error::Config(format!(
            "{} must be set to a non-empty value",
            name
        ))),
    }
}

/// Validate an `Authorization` header against the configured credentials.
///
/// Accepts only the `Basic` scheme with an exact username and password
/// match. A missing header, an unparsable header, and a credential
/// mismatch are all plain `false` — the caller's rejection is identical in
/// every case, so the response never reveals which check failed.
pub fn check_basic(auth_header: Option<&str>, credentials: &Credentials) -> bool {
    let header = match auth_header {
        Some(h) => h,
        None => return false,
    };

    let encoded = match header.strip_prefix("Basic ") {
        Some(rest) => rest.trim(),
        None => return false,
    };

    let decoded = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let pair = match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(_) => return false,
    };

    match pair.split_once(':') {
        Some((user, pass)) => user == credentials.username && pass == credentials.password,
        None => false,
    }
}
