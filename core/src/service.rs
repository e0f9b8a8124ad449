//! Booking service: validation, admission, and listing in one place.
//!
//! # Request Flow
//!
//! 1. **Validate** the raw payload into a [`NewBooking`]
//! 2. **Pre-check** capacity against the current slot total (no lock held)
//! 3. **Create** through the store, which re-runs the guard under the slot lock
//!
//! The pre-check lets full slots fail fast without opening a transaction.
//! Only the locked check inside the store decides what gets committed.

use crate::booking_store::BookingStore;
use crate::capacity::{Admission, CapacityGuard};
use crate::error::BookingError;
use crate::types::{Booking, NewBooking, PartySize, Slot};
use crate::validation::CreateBookingRequest;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Counter: booking requests by outcome.
pub const BOOKINGS_TOTAL: &str = "slotbook_bookings_total";

/// Histogram: party size of created bookings.
pub const BOOKING_PARTY_SIZE: &str = "slotbook_booking_party_size";

/// Entry point for booking operations.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    guard: CapacityGuard,
}

impl BookingService {
    /// Create a service with the default per-slot capacity.
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            guard: CapacityGuard::default(),
        }
    }

    /// Replace the capacity guard.
    #[must_use]
    pub fn with_guard(mut self, guard: CapacityGuard) -> Self {
        self.guard = guard;
        self
    }

    /// The capacity guard in use
    #[must_use]
    pub const fn guard(&self) -> CapacityGuard {
        self.guard
    }

    /// Decide whether `requested` more people fit in `slot` right now.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the slot total cannot be read.
    pub async fn check_capacity(
        &self,
        slot: Slot,
        requested: PartySize,
    ) -> Result<Admission, BookingError> {
        let current_total = self.store.slot_total(slot).await?;
        Ok(self.guard.admit(current_total, requested))
    }

    /// Validate a request and create the booking.
    ///
    /// # Errors
    ///
    /// - `Validation`: The payload is malformed or incomplete
    /// - `CapacityExceeded`: The slot cannot take the party
    /// - `Persistence`: Storage failed; nothing was written
    #[tracing::instrument(skip(self, request))]
    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, BookingError> {
        let result = match request.validate(self.guard) {
            Ok(new) => self.admit(new).await,
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    slot = %booking.slot(),
                    party_size = booking.party_size.get(),
                    amenities = booking.amenities.len(),
                    "Booking created"
                );
                metrics::histogram!(BOOKING_PARTY_SIZE).record(f64::from(booking.party_size.get()));
                "created"
            }
            Err(BookingError::Validation(message)) => {
                warn!(reason = %message, "Booking request rejected");
                "rejected_validation"
            }
            Err(e @ BookingError::CapacityExceeded { .. }) => {
                warn!(reason = %e, "Booking request rejected");
                "rejected_capacity"
            }
            Err(e @ BookingError::Persistence(_)) => {
                error!(error = %e, "Error creating booking");
                "failed"
            }
        };
        metrics::counter!(BOOKINGS_TOTAL, "outcome" => outcome).increment(1);

        result
    }

    async fn admit(&self, new: NewBooking) -> Result<Booking, BookingError> {
        if let Admission::Reject = self.check_capacity(new.slot, new.party_size).await? {
            return Err(self.guard.rejection());
        }
        self.store.create_booking(new, self.guard).await
    }

    /// All bookings with their amenities, by date then start time.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the listing query fails.
    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        self.store.list_bookings().await.inspect_err(|e| {
            error!(error = %e, "Error fetching bookings");
        })
    }
}
