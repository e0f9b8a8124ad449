//! Booking store trait: the persistence seam for bookings.
//!
//! # Implementations
//!
//! - `PostgresBookingStore` (in `slotbook-postgres`): Production implementation
//! - `InMemoryBookingStore` (in `slotbook-testing`): Fast, deterministic testing
//!
//! # Example
//!
//! ```no_run
//! use slotbook_core::booking_store::BookingStore;
//! use slotbook_core::capacity::CapacityGuard;
//! use slotbook_core::error::BookingError;
//! use slotbook_core::types::NewBooking;
//!
//! async fn example<S: BookingStore>(store: &S, new: NewBooking) -> Result<(), BookingError> {
//!     let total = store.slot_total(new.slot).await?;
//!     println!("{total} people already booked");
//!
//!     let booking = store.create_booking(new, CapacityGuard::default()).await?;
//!     println!("created {}", booking.id);
//!
//!     let all = store.list_bookings().await?;
//!     assert!(all.iter().any(|b| b.id == booking.id));
//!     Ok(())
//! }
//! ```

use crate::capacity::CapacityGuard;
use crate::error::BookingError;
use crate::types::{Booking, NewBooking, Slot};
use std::future::Future;
use std::pin::Pin;

/// Storage for bookings and their amenity associations.
///
/// Implementations must be `Send + Sync` to be shared across request tasks.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so that `Arc<dyn BookingStore>` can live in web application state.
pub trait BookingStore: Send + Sync {
    /// Sum of `party_size` over active bookings in exactly this slot.
    ///
    /// A slot with no bookings has a total of 0.
    ///
    /// # Errors
    ///
    /// - `Persistence`: Storage query failed
    fn slot_total(
        &self,
        slot: Slot,
    ) -> Pin<Box<dyn Future<Output = Result<u64, BookingError>> + Send + '_>>;

    /// Admit and persist a booking as one atomic unit.
    ///
    /// Under a lock scoped to the booking's slot, the store reads the slot
    /// total, applies `guard`, inserts the booking with status `active`,
    /// resolves `amenity_names` against the reference amenities (unknown names
    /// are dropped), and links the resolved amenities. Either everything
    /// commits or nothing does.
    ///
    /// The returned booking lists resolved amenity names alphabetically.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded`: The guard rejected the party; nothing was written
    /// - `Persistence`: Any storage failure; the unit was rolled back
    fn create_booking(
        &self,
        booking: NewBooking,
        guard: CapacityGuard,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, BookingError>> + Send + '_>>;

    /// All bookings ordered by date, then start time.
    ///
    /// Ties are broken by creation time and then id so repeated listings are
    /// identical. Each booking appears once with its amenities sorted.
    ///
    /// # Errors
    ///
    /// - `Persistence`: Storage query failed
    fn list_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, BookingError>> + Send + '_>>;
}
