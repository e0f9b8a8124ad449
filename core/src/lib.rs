//! # Slotbook Core
//!
//! Domain types and rules for a slot booking API.
//!
//! Members book a party into a slot (a date and a start time). Each slot holds
//! at most six people across its active bookings, and a booking may carry
//! amenities drawn from a fixed reference set.
//!
//! ## Core Concepts
//!
//! - **Validation**: [`validation::CreateBookingRequest`] turns a raw payload into a [`types::NewBooking`]
//! - **Capacity Guard**: [`capacity::CapacityGuard`] decides whether a party fits a slot
//! - **Booking Store**: [`booking_store::BookingStore`] admits and persists bookings atomically
//! - **Service**: [`service::BookingService`] ties the three together for the HTTP layer
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use slotbook_core::service::BookingService;
//! use slotbook_core::validation::CreateBookingRequest;
//!
//! let service = BookingService::new(store);
//! let request: CreateBookingRequest = serde_json::from_value(serde_json::json!({
//!     "memberName": "Ada",
//!     "date": "2025-03-14",
//!     "startTime": "09:00",
//!     "partySize": 2,
//!     "amenities": ["wifi", "parking"],
//! }))?;
//!
//! let booking = service.create(request).await?;
//! assert_eq!(booking.start_time.to_string(), "09:00");
//! ```

pub mod booking_store;
pub mod capacity;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use booking_store::BookingStore;
pub use capacity::{Admission, CapacityGuard, SLOT_CAPACITY};
pub use error::BookingError;
pub use service::BookingService;
pub use types::{
    AmenityId, Booking, BookingId, BookingStatus, MemberName, NewBooking, PartySize, Slot,
    StartTime,
};
pub use validation::CreateBookingRequest;

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits so that stores which
/// assign timestamps themselves (rather than delegating to a database) can be
/// driven deterministically in tests.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
