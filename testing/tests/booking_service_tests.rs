//! Booking service behaviour against the in-memory store.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use proptest::prelude::*;
use serde_json::json;
use slotbook_core::capacity::{Admission, CapacityGuard};
use slotbook_core::error::BookingError;
use slotbook_core::service::BookingService;
use slotbook_core::types::{BookingStatus, PartySize, Slot, StartTime};
use slotbook_core::validation::{PARTY_SIZE_MESSAGE, REQUIRED_FIELDS_MESSAGE};
use slotbook_testing::helpers::init_tracing;
use slotbook_testing::{BookingRequestBuilder, InMemoryBookingStore, properties, test_clock};
use std::sync::Arc;

const DATE: &str = "2025-03-14";

fn service(store: &InMemoryBookingStore) -> BookingService {
    BookingService::new(Arc::new(store.clone()))
}

fn slot(time: &str) -> Slot {
    Slot::new(
        chrono::NaiveDate::parse_from_str(DATE, "%Y-%m-%d").unwrap(),
        StartTime::parse(time).unwrap(),
    )
}

async fn book(service: &BookingService, time: &str, size: u32) -> Result<slotbook_core::Booking, BookingError> {
    service
        .create(BookingRequestBuilder::new("Ada", DATE, time).party_size(size).build())
        .await
}

#[tokio::test]
async fn admitted_booking_appears_in_listing_as_active() {
    init_tracing();
    let store = InMemoryBookingStore::new();
    let service = service(&store);

    let created = book(&service, "09:00", 3).await.unwrap();
    let listed = service.list().await.unwrap();

    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(created.status, BookingStatus::Active);
}

#[tokio::test]
async fn omitted_party_size_defaults_to_one() {
    let store = InMemoryBookingStore::new();
    let booking = service(&store)
        .create(BookingRequestBuilder::new("Ada", DATE, "09:00").build())
        .await
        .unwrap();

    assert_eq!(booking.party_size.get(), 1);
}

#[tokio::test]
async fn slot_boundary_at_five() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);
    book(&service, "09:00", 5).await.unwrap();

    let err = book(&service, "09:00", 2).await.unwrap_err();
    assert_eq!(err.to_string(), "This time slot is full. Max 6 people per slot.");
    assert_eq!(store.booking_count(), 1);

    book(&service, "09:00", 1).await.unwrap();
    assert_eq!(store.committed_total(slot("09:00")), 6);
}

#[tokio::test]
async fn other_slots_are_independent() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);
    book(&service, "09:00", 6).await.unwrap();

    book(&service, "09:30", 6).await.unwrap();
    let next_day = service
        .create(BookingRequestBuilder::new("Ada", "2025-03-15", "09:00").party_size(6).build())
        .await;
    assert!(next_day.is_ok());
}

#[tokio::test]
async fn check_capacity_reads_current_total() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);
    let two = PartySize::new(2).unwrap();

    assert_eq!(service.check_capacity(slot("09:00"), two).await.unwrap(), Admission::Admit);
    book(&service, "09:00", 5).await.unwrap();
    assert_eq!(service.check_capacity(slot("09:00"), two).await.unwrap(), Admission::Reject);
}

#[tokio::test]
async fn custom_capacity_changes_the_message() {
    let store = InMemoryBookingStore::new();
    let service = service(&store).with_guard(CapacityGuard::new(2));

    let err = book(&service, "09:00", 3).await.unwrap_err();
    assert_eq!(err.to_string(), "This time slot is full. Max 2 people per slot.");
}

#[tokio::test]
async fn unknown_amenities_are_dropped_and_known_sorted() {
    let store = InMemoryBookingStore::new().with_amenities(["wifi", "parking", "lockers"]);
    let booking = service(&store)
        .create(
            BookingRequestBuilder::new("Ada", DATE, "09:00")
                .amenities(["wifi", "parking", "doesnotexist"])
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(booking.amenities, vec!["parking", "wifi"]);
}

#[tokio::test]
async fn booking_without_amenities_lists_empty() {
    let store = InMemoryBookingStore::new().with_amenities(["wifi"]);
    let service = service(&store);
    book(&service, "09:00", 1).await.unwrap();

    let listed = service.list().await.unwrap();
    assert!(listed[0].amenities.is_empty());
}

#[tokio::test]
async fn validation_errors_touch_nothing() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);

    let missing = service
        .create(serde_json::from_value(json!({ "memberName": "Ada" })).unwrap())
        .await
        .unwrap_err();
    assert_eq!(missing, BookingError::validation(REQUIRED_FIELDS_MESSAGE));

    let bad_size = service
        .create(
            BookingRequestBuilder::new("Ada", DATE, "09:00")
                .raw_party_size(json!("lots"))
                .build(),
        )
        .await
        .unwrap_err();
    assert_eq!(bad_size, BookingError::validation(PARTY_SIZE_MESSAGE));
    assert_eq!(store.booking_count(), 0);
}

#[tokio::test]
async fn oversized_unstorable_party_gets_capacity_message() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);

    for raw in [json!(7.5), json!(1e12)] {
        let err = service
            .create(
                BookingRequestBuilder::new("Ada", DATE, "09:00")
                    .raw_party_size(raw)
                    .build(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::CapacityExceeded { capacity: 6 });
    }
    assert_eq!(store.booking_count(), 0);
}

#[tokio::test]
async fn amenity_link_failure_rolls_back() {
    let store = InMemoryBookingStore::new().with_amenities(["wifi"]);
    store.fail_amenity_links(true);

    let err = service(&store)
        .create(BookingRequestBuilder::new("Ada", DATE, "09:00").amenities(["wifi"]).build())
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Persistence(_)));
    assert_eq!(store.booking_count(), 0);
    assert_eq!(store.link_count(), 0);
}

#[tokio::test]
async fn storage_failure_surfaces_as_persistence() {
    let store = InMemoryBookingStore::new();
    store.fail_queries(true);
    let service = service(&store);

    assert!(matches!(book(&service, "09:00", 1).await, Err(BookingError::Persistence(_))));
    assert!(matches!(service.list().await, Err(BookingError::Persistence(_))));
}

#[tokio::test]
async fn listing_is_stable_without_writes() {
    let store = InMemoryBookingStore::new().with_clock(Arc::new(test_clock()));
    let service = service(&store);
    for (time, size) in [("10:00", 1), ("09:00", 2), ("09:00", 1), ("08:15", 4)] {
        book(&service, time, size).await.unwrap();
    }

    let first = service.list().await.unwrap();
    let second = service.list().await.unwrap();
    assert_eq!(first, second);

    let times: Vec<String> = first.iter().map(|b| b.start_time.to_string()).collect();
    assert_eq!(times, vec!["08:15", "09:00", "09:00", "10:00"]);
}

#[tokio::test]
async fn seconds_are_not_rendered() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);

    let created = service
        .create(BookingRequestBuilder::new("Ada", DATE, "09:05:00").build())
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(&created).unwrap()["startTime"], "09:05");

    let listed = service.list().await.unwrap();
    assert_eq!(serde_json::to_value(&listed[0]).unwrap()["startTime"], "09:05");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_overfill_a_slot() {
    let store = InMemoryBookingStore::new();
    let service = service(&store);

    let attempts = (0..12).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { book(&service, "09:00", 2).await })
    });
    let results = futures::future::join_all(attempts).await;

    let admitted = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
    assert_eq!(admitted, 3);
    assert_eq!(store.committed_total(slot("09:00")), 6);
}

proptest! {
    #[test]
    fn committed_totals_never_exceed_capacity(
        requests in prop::collection::vec((properties::crowded_slot(), properties::party_size()), 1..40)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let store = InMemoryBookingStore::new();
        let service = service(&store);

        runtime.block_on(async {
            for (slot, size) in &requests {
                let before = store.committed_total(*slot);
                let request = BookingRequestBuilder::new(
                    "Ada",
                    &slot.date.format("%Y-%m-%d").to_string(),
                    &slot.start_time.to_string(),
                )
                .party_size(size.get())
                .build();

                let admitted = service.create(request).await.is_ok();
                prop_assert_eq!(admitted, before + u64::from(size.get()) <= 6);
                prop_assert!(store.committed_total(*slot) <= 6);
            }
            Ok(())
        })?;
    }

    #[test]
    fn any_start_time_round_trips_through_the_store(time in properties::start_time()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let store = InMemoryBookingStore::new();

        let booking = runtime
            .block_on(service(&store).create(BookingRequestBuilder::new("Ada", DATE, &time.to_string()).build()))
            .unwrap();
        prop_assert_eq!(booking.start_time, time);
    }
}
