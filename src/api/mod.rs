//! HTTP API
//!
//! The vault's entire request-handling surface: catalog, upload, download.

mod http;

pub use http::{AppState, HttpServer};
