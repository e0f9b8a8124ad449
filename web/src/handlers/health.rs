//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Health {
    /// Always `ok`
    pub status: &'static str,
    /// Crate version of the running server
    pub version: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// Does NOT check the database.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "version": "0.1.0" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
