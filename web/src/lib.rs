//! Axum HTTP surface for the Slotbook booking API.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives and gets a correlation ID
//! 2. **Extract** the JSON payload (malformed bodies become 400 `{error}`)
//! 3. **Call** [`BookingService`](slotbook_core::BookingService)
//! 4. **Map** the result or [`BookingError`](slotbook_core::BookingError) to an HTTP response
//!
//! # Routes
//!
//! | Method | Path            | Handler                              |
//! |--------|-----------------|--------------------------------------|
//! | POST   | `/api/bookings` | [`handlers::create_booking`]         |
//! | GET    | `/api/bookings` | [`handlers::list_bookings`]          |
//! | GET    | `/health`       | [`handlers::health_check`]           |
//!
//! # Example
//!
//! ```ignore
//! use slotbook_web::{AppState, router};
//!
//! let app = router(AppState::new(service));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::JsonPayload;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Build the application router with all routes and layers.
#[must_use]
pub fn router(state: AppState) -> Router {
    let api = Router::new().route(
        "/bookings",
        get(handlers::list_bookings).post(handlers::create_booking),
    );

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
        .with_state(state)
}
