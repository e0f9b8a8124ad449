//! Error taxonomy for booking operations.
//!
//! Validation and capacity messages are part of the observable contract and
//! reach clients verbatim. Persistence details are for logs only.

use thiserror::Error;

/// Errors that can occur while creating or listing bookings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The slot cannot take the requested party.
    #[error("This time slot is full. Max {capacity} people per slot.")]
    CapacityExceeded {
        /// Capacity of the slot that rejected the request.
        capacity: u32,
    },

    /// Storage failure of any kind during read or write.
    #[error("Storage error: {0}")]
    Persistence(String),
}

impl BookingError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a persistence error.
    #[must_use]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// True for errors caused by the request rather than the system.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::CapacityExceeded { .. })
    }
}

/// Result type alias for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;
