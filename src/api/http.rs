//! HTTP Server
//!
//! Three routes cover the vault: `/` renders the catalog, `/upload` stores
//! a multipart file field, `/download` streams a stored file back. Upload
//! and download sit behind a Basic auth gate; the catalog does not.
//!
//! Routes are registered with `any()` and the verb is checked inside each
//! handler, so a wrong-method request gets a 405 with a plain-text body
//! instead of an empty framework response.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::{self, Credentials};
use crate::config::{ServerConfig, VaultConfig};
use crate::error::{Error, Result};
use crate::storage;

/// Shared application state
pub struct AppState {
    /// Vault root directory
    pub vault_root: PathBuf,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Shared vault credentials
    pub credentials: Credentials,
}

impl AppState {
    /// Build the state from configuration plus environment credentials
    pub fn new(config: &VaultConfig, credentials: Credentials) -> Self {
        Self {
            vault_root: config.vault_root().clone(),
            max_upload_bytes: config.max_upload_bytes(),
            credentials,
        }
    }
}

/// HTTP vault server
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Create the router
    fn create_router(state: Arc<AppState>) -> Router {
        let protected = Router::new()
            .route("/upload", any(handle_upload))
            .route("/download", any(handle_download))
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                require_basic_auth,
            ));

        Router::new()
            .route("/", any(handle_catalog))
            .merge(protected)
            .layer(DefaultBodyLimit::max(state.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let app = Self::create_router(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(&self.config.bind_address).await?;
        info!("FileVault listening on {}", self.config.bind_address);

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

// ============ Auth gate ============

/// Basic auth gate for `/upload` and `/download`.
///
/// Missing, malformed, and mismatched credentials all get the identical
/// 401 challenge; the inner handler is never reached.
async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if auth::check_basic(header_value, &state.credentials) {
        return next.run(request).await;
    }

    warn!("rejected unauthenticated request to {}", request.uri().path());
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Basic realm="Restricted""#),
        )],
        "Unauthorized\n",
    )
        .into_response()
}

// ============ Handlers ============

/// GET / → catalog listing.
///
/// When enumeration fails partway, the entries collected so far still
/// render ahead of the error text and the closing tag is dropped, matching
/// the partial-then-error body shape the vault has always produced.
async fn handle_catalog(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed();
    }

    let (files, scan_err) = storage::scan(&state.vault_root);

    let mut body = String::from("<h1>File Vault</h1>\n<ul>\n");
    for file in &files {
        body.push_str(&format!(
            "<li><a href=\"/download?filename={}\">{}</a> ({}, {})</li>\n",
            urlencoding::encode(&file.name),
            html_escape(&file.name),
            storage::format_size(file.size),
            storage::format_timestamp(file.modified),
        ));
    }

    if let Some(e) = scan_err {
        error!("catalog enumeration failed: {}", e);
        body.push_str(&format!("Error: {}", e));
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response();
    }

    body.push_str("</ul>\n");
    Html(body).into_response()
}

/// POST /upload → store a multipart file field.
async fn handle_upload(
    State(state): State<Arc<AppState>>,
    method: Method,
    request: Request,
) -> Response {
    if method != Method::POST {
        return method_not_allowed();
    }

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(m) => m,
        Err(e) => return bad_request(&e.to_string()),
    };

    let mut destination: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return bad_request(&e.to_string()),
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("filename") => match field.text().await {
                Ok(value) if !value.is_empty() => destination = Some(value),
                Ok(_) => {}
                Err(e) => return bad_request(&e.to_string()),
            },
            Some("file") => {
                let original = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(data) => file = Some((original, data)),
                    Err(e) => return bad_request(&e.to_string()),
                }
            }
            _ => {
                // Drain unknown fields so the body parse can continue
                if let Err(e) = field.bytes().await {
                    return bad_request(&e.to_string());
                }
            }
        }
    }

    let Some((original_name, data)) = file else {
        return bad_request("form field \"file\" is missing");
    };

    let name = destination.unwrap_or(original_name);
    let name = match storage::sanitize_filename(&name) {
        Ok(name) => name,
        Err(e) => return bad_request(&e.to_string()),
    };

    let path = state.vault_root.join(name);

    // Create-and-truncate: same-named files are overwritten in place
    let mut dest = match tokio::fs::File::create(&path).await {
        Ok(f) => f,
        Err(e) => {
            error!("failed to create {:?}: {}", path, e);
            return internal_error(&e.to_string());
        }
    };

    if let Err(e) = dest.write_all(&data).await {
        error!("failed to write {:?}: {}", path, e);
        return internal_error(&e.to_string());
    }
    if let Err(e) = dest.flush().await {
        error!("failed to flush {:?}: {}", path, e);
        return internal_error(&e.to_string());
    }

    info!("stored {} ({} bytes)", name, data.len());
    (StatusCode::OK, "File uploaded successfully.\n").into_response()
}

/// GET /download?filename=NAME → stream a stored file back.
///
/// A read failure after the headers are flushed truncates the transfer on
/// the wire; the client sees a short body rather than a clean error.
async fn handle_download(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method != Method::GET {
        return method_not_allowed();
    }

    let name = match params.get("filename").map(String::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return (StatusCode::BAD_REQUEST, "Filename not provided\n").into_response();
        }
    };

    let name = match storage::sanitize_filename(name) {
        Ok(name) => name,
        Err(e) => return bad_request(&e.to_string()),
    };

    let path = state.vault_root.join(name);

    // Any open failure surfaces as 400, not-found included
    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            warn!("failed to open {:?}: {}", path, e);
            return bad_request(&e.to_string());
        }
    };

    let disposition =
        match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
            Ok(v) => v,
            Err(_) => return bad_request("filename is not a valid header value"),
        };

    info!("serving {}", name);
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response()
}

// ============ Helpers ============

fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed\n").into_response()
}

fn bad_request(detail: &str) -> Response {
    (StatusCode::BAD_REQUEST, format!("Error: {}", detail)).into_response()
}

fn internal_error(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error: {}", detail),
    )
        .into_response()
}

/// HTML-escape a name for use in the catalog markup
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
