//! Application state for Axum handlers.

use slotbook_core::service::BookingService;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booking operations
    pub service: BookingService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(service: BookingService) -> Self {
        Self { service }
    }
}
