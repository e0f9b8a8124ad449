//! Booking endpoints.

use crate::WebResult;
use crate::error::AppError;
use crate::extractors::JsonPayload;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use slotbook_core::types::Booking;
use slotbook_core::validation::CreateBookingRequest;

/// Returned with 500 when creating a booking fails in storage.
pub const CREATE_FAILED_MESSAGE: &str = "Server error creating booking";

/// Returned with 500 when listing bookings fails in storage.
pub const LIST_FAILED_MESSAGE: &str = "Server error fetching bookings";

/// Create a booking.
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings
/// Content-Type: application/json
///
/// {
///   "memberName": "Ada",
///   "date": "2025-03-14",
///   "startTime": "09:00",
///   "partySize": 2,
///   "amenities": ["wifi"]
/// }
/// ```
///
/// # Responses
///
/// - 201: the created booking
/// - 400: `{"error": ...}` for invalid input or a full slot
/// - 500: `{"error": "Server error creating booking"}`
///
/// # Errors
///
/// See responses above.
pub async fn create_booking(
    State(state): State<AppState>,
    JsonPayload(request): JsonPayload<CreateBookingRequest>,
) -> WebResult<(StatusCode, Json<Booking>)> {
    let booking = state
        .service
        .create(request)
        .await
        .map_err(|e| AppError::from_booking(e, CREATE_FAILED_MESSAGE))?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// List all bookings with their amenities, ordered by date then start time.
///
/// # Errors
///
/// 500 `{"error": "Server error fetching bookings"}` if storage fails.
pub async fn list_bookings(State(state): State<AppState>) -> WebResult<Json<Vec<Booking>>> {
    let bookings = state
        .service
        .list()
        .await
        .map_err(|e| AppError::from_booking(e, LIST_FAILED_MESSAGE))?;

    Ok(Json(bookings))
}
