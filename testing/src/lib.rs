//! # Slotbook Testing
//!
//! Testing utilities and helpers for the Slotbook booking API.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - An in-memory [`BookingStore`](slotbook_core::BookingStore)
//! - Request builders for common test scenarios
//! - Property-based testing strategies for domain types
//!
//! ## Example
//!
//! ```ignore
//! use slotbook_testing::{InMemoryBookingStore, BookingRequestBuilder};
//! use slotbook_core::BookingService;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let store = InMemoryBookingStore::new().with_amenities(["wifi"]);
//!     let service = BookingService::new(Arc::new(store.clone()));
//!
//!     let request = BookingRequestBuilder::new("Ada", "2025-03-14", "09:00")
//!         .party_size(2)
//!         .amenities(["wifi"])
//!         .build();
//!
//!     let booking = service.create(request).await.unwrap();
//!     assert_eq!(booking.amenities, vec!["wifi"]);
//!     assert_eq!(store.booking_count(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use slotbook_core::environment::Clock;

pub mod booking_mocks;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use slotbook_testing::mocks::FixedClock;
    /// use slotbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use serde_json::{Value, json};
    use slotbook_core::validation::CreateBookingRequest;

    /// Fluent builder for `POST /api/bookings` payloads.
    ///
    /// Starts from the three required fields; everything else is omitted
    /// unless set, so the built request exercises the same defaults a client
    /// would hit.
    #[derive(Debug, Clone)]
    pub struct BookingRequestBuilder {
        request: CreateBookingRequest,
    }

    impl BookingRequestBuilder {
        /// Start a request for `member_name` at `date` (`YYYY-MM-DD`) and `start_time` (`HH:MM`)
        #[must_use]
        pub fn new(member_name: &str, date: &str, start_time: &str) -> Self {
            Self {
                request: CreateBookingRequest {
                    member_name: Some(json!(member_name)),
                    date: Some(json!(date)),
                    start_time: Some(json!(start_time)),
                    ..CreateBookingRequest::default()
                },
            }
        }

        /// Set the party size
        #[must_use]
        pub fn party_size(mut self, size: u32) -> Self {
            self.request.party_size = Some(json!(size));
            self
        }

        /// Set the party size to an arbitrary JSON value
        #[must_use]
        pub fn raw_party_size(mut self, value: Value) -> Self {
            self.request.party_size = Some(value);
            self
        }

        /// Request amenities by name
        #[must_use]
        pub fn amenities<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
            self.request.amenities = Some(Value::Array(names.into_iter().map(|n| json!(n)).collect()));
            self
        }

        /// Finish the request
        #[must_use]
        pub fn build(self) -> CreateBookingRequest {
            self.request
        }

        /// Finish the request as a JSON body
        #[must_use]
        pub fn json(self) -> Value {
            serde_json::to_value(self.request).unwrap_or(Value::Null)
        }
    }

    /// Install a test-friendly tracing subscriber. Safe to call repeatedly.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "slotbook=debug".into()),
            )
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use slotbook_core::types::{PartySize, Slot, StartTime};

    /// Any start time on a minute boundary
    pub fn start_time() -> impl Strategy<Value = StartTime> {
        (0u32..24, 0u32..60).prop_filter_map("valid time", |(h, m)| StartTime::from_hm(h, m))
    }

    /// A slot drawn from a small pool, so generated bookings collide often
    pub fn crowded_slot() -> impl Strategy<Value = Slot> {
        (1u32..=3, prop_oneof![Just((9u32, 0u32)), Just((9, 30)), Just((10, 0))]).prop_filter_map(
            "valid slot",
            |(day, (h, m))| {
                let date = chrono::NaiveDate::from_ymd_opt(2025, 3, day)?;
                Some(Slot::new(date, StartTime::from_hm(h, m)?))
            },
        )
    }

    /// Party sizes around the default capacity
    pub fn party_size() -> impl Strategy<Value = PartySize> {
        (1u32..=8).prop_filter_map("positive", PartySize::new)
    }
}

// Re-export commonly used items
pub use booking_mocks::InMemoryBookingStore;
pub use helpers::BookingRequestBuilder;
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn builder_omits_unset_fields() {
        let body = BookingRequestBuilder::new("Ada", "2025-03-14", "09:00").json();
        assert_eq!(body["memberName"], "Ada");
        assert!(body.get("partySize").is_none());
        assert!(body.get("amenities").is_none());
    }
}
