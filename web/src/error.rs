//! Error types for web handlers.
//!
//! This module bridges [`BookingError`] and HTTP responses, implementing
//! Axum's `IntoResponse` trait. Every error body has the shape
//! `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use slotbook_core::error::BookingError;
use std::fmt;

/// Application error type for web handlers.
///
/// Server errors carry an optional source that is logged when the response
/// is rendered and never sent to the client.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
///     let bookings = state.service.list().await
///         .map_err(|e| AppError::from_booking(e, "Server error fetching bookings"))?;
///     Ok(Json(bookings))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    /// Map a booking error to a response.
    ///
    /// Validation and capacity errors become 400 with their own message.
    /// Persistence errors become 500 with `server_message`; the storage
    /// detail is kept as the source.
    #[must_use]
    pub fn from_booking(err: BookingError, server_message: &str) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(server_message).with_source(anyhow::Error::new(err))
        }
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Human-readable error message.
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            error: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[400] Invalid input");
    }

    #[test]
    fn validation_maps_to_400_with_message() {
        let err = AppError::from_booking(
            BookingError::validation("partySize must be a positive number"),
            "Server error creating booking",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "partySize must be a positive number");
        assert!(err.source().is_none());
    }

    #[test]
    fn capacity_maps_to_400_with_message() {
        let err = AppError::from_booking(
            BookingError::CapacityExceeded { capacity: 6 },
            "Server error creating booking",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "This time slot is full. Max 6 people per slot.");
    }

    #[test]
    fn persistence_hides_detail() {
        let err = AppError::from_booking(
            BookingError::persistence("connection refused"),
            "Server error fetching bookings",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Server error fetching bookings");
        assert!(err.source().unwrap().to_string().contains("connection refused"));
    }
}
