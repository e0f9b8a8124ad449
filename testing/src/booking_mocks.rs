//! In-memory booking store for fast, deterministic testing.
//!
//! [`InMemoryBookingStore`] implements the same admission and atomicity
//! contract as the `PostgreSQL` store:
//! - one mutex serializes every write, so the capacity check and the insert
//!   cannot interleave with another request
//! - writes are staged on a copy of the state and swapped in only on success,
//!   so an injected failure leaves nothing behind

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use chrono::{DateTime, Utc};
use slotbook_core::booking_store::BookingStore;
use slotbook_core::capacity::CapacityGuard;
use slotbook_core::environment::{Clock, SystemClock};
use slotbook_core::error::BookingError;
use slotbook_core::types::{
    AmenityId, Booking, BookingId, BookingStatus, MemberName, NewBooking, PartySize, Slot,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
struct StoredBooking {
    id: BookingId,
    member_name: MemberName,
    slot: Slot,
    party_size: PartySize,
    status: BookingStatus,
    created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
struct StoreState {
    bookings: Vec<StoredBooking>,
    amenities: Vec<(AmenityId, String)>,
    links: Vec<(BookingId, AmenityId)>,
}

impl StoreState {
    fn slot_total(&self, slot: Slot) -> u64 {
        self.bookings
            .iter()
            .filter(|b| b.slot == slot && b.status == BookingStatus::Active)
            .map(|b| u64::from(b.party_size.get()))
            .sum()
    }

    fn amenity_names_for(&self, booking_id: BookingId) -> Vec<String> {
        let mut names: Vec<String> = self
            .links
            .iter()
            .filter(|(b, _)| *b == booking_id)
            .filter_map(|(_, a)| {
                self.amenities
                    .iter()
                    .find(|(id, _)| id == a)
                    .map(|(_, name)| name.clone())
            })
            .collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| b.cmp(a))
        });
        names
    }

    fn hydrate(&self, stored: &StoredBooking) -> Booking {
        Booking {
            id: stored.id,
            member_name: stored.member_name.clone(),
            date: stored.slot.date,
            start_time: stored.slot.start_time,
            party_size: stored.party_size,
            status: stored.status,
            amenities: self.amenity_names_for(stored.id),
            created_at: stored.created_at,
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_amenity_links: AtomicBool,
    fail_queries: AtomicBool,
}

/// In-memory booking store.
///
/// # Example
///
/// ```
/// use slotbook_testing::InMemoryBookingStore;
///
/// let store = InMemoryBookingStore::new().with_amenities(["wifi", "parking"]);
/// assert_eq!(store.booking_count(), 0);
/// ```
#[derive(Clone)]
pub struct InMemoryBookingStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
    faults: Arc<Faults>,
}

impl InMemoryBookingStore {
    /// Create an empty store with no reference amenities
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock: Arc::new(SystemClock),
            faults: Arc::new(Faults::default()),
        }
    }

    /// Use `clock` to stamp `created_at`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the reference amenity set
    #[must_use]
    pub fn with_amenities<I, N>(self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        for name in names {
            self.add_amenity(name);
        }
        self
    }

    /// Add one reference amenity, returning its id.
    ///
    /// Adding an existing name returns the existing id.
    pub fn add_amenity(&self, name: impl Into<String>) -> AmenityId {
        let name = name.into();
        let mut state = self.state.lock().unwrap();
        if let Some((id, _)) = state.amenities.iter().find(|(_, n)| *n == name) {
            return *id;
        }
        let id = AmenityId::new();
        state.amenities.push((id, name));
        id
    }

    /// Make every amenity link insert fail, after the booking row is staged.
    pub fn fail_amenity_links(&self, fail: bool) {
        self.faults.fail_amenity_links.store(fail, Ordering::SeqCst);
    }

    /// Make every store operation fail with a persistence error.
    pub fn fail_queries(&self, fail: bool) {
        self.faults.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Number of stored bookings
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.state.lock().unwrap().bookings.len()
    }

    /// Number of stored booking/amenity links
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    /// Committed party total for `slot`
    #[must_use]
    pub fn committed_total(&self, slot: Slot) -> u64 {
        self.state.lock().unwrap().slot_total(slot)
    }

    fn check_queries(&self) -> Result<(), BookingError> {
        if self.faults.fail_queries.load(Ordering::SeqCst) {
            Err(BookingError::persistence("injected query failure"))
        } else {
            Ok(())
        }
    }

    fn create_now(&self, booking: NewBooking, guard: CapacityGuard) -> Result<Booking, BookingError> {
        self.check_queries()?;

        let mut state = self.state.lock().unwrap();
        let mut staged = state.clone();

        guard.check(staged.slot_total(booking.slot), booking.party_size)?;

        let stored = StoredBooking {
            id: BookingId::new(),
            member_name: booking.member_name,
            slot: booking.slot,
            party_size: booking.party_size,
            status: BookingStatus::Active,
            created_at: self.clock.now(),
        };
        staged.bookings.push(stored.clone());

        let resolved: Vec<AmenityId> = staged
            .amenities
            .iter()
            .filter(|(_, name)| booking.amenity_names.contains(name))
            .map(|(id, _)| *id)
            .collect();

        if !resolved.is_empty() && self.faults.fail_amenity_links.load(Ordering::SeqCst) {
            return Err(BookingError::persistence("injected amenity link failure"));
        }
        staged
            .links
            .extend(resolved.into_iter().map(|amenity_id| (stored.id, amenity_id)));

        let created = staged.hydrate(&stored);
        *state = staged;
        Ok(created)
    }

    fn list_now(&self) -> Result<Vec<Booking>, BookingError> {
        self.check_queries()?;

        let state = self.state.lock().unwrap();
        let mut bookings: Vec<&StoredBooking> = state.bookings.iter().collect();
        bookings.sort_by(|a, b| {
            (a.slot, a.created_at, a.id.as_uuid()).cmp(&(b.slot, b.created_at, b.id.as_uuid()))
        });
        Ok(bookings.into_iter().map(|b| state.hydrate(b)).collect())
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn slot_total(
        &self,
        slot: Slot,
    ) -> Pin<Box<dyn Future<Output = Result<u64, BookingError>> + Send + '_>> {
        let result = self
            .check_queries()
            .map(|()| self.committed_total(slot));
        Box::pin(async move { result })
    }

    fn create_booking(
        &self,
        booking: NewBooking,
        guard: CapacityGuard,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, BookingError>> + Send + '_>> {
        let result = self.create_now(booking, guard);
        Box::pin(async move { result })
    }

    fn list_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, BookingError>> + Send + '_>> {
        let result = self.list_now();
        Box::pin(async move { result })
    }
}
