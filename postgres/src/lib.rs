//! `PostgreSQL` booking store for Slotbook.
//!
//! This crate provides the production implementation of the
//! [`BookingStore`](slotbook_core::BookingStore) trait from `slotbook-core`.
//! It uses sqlx with runtime-checked queries and supports:
//!
//! - Atomic admission: capacity check, booking insert, and amenity links in one transaction
//! - Per-slot serialization through transaction-scoped advisory locks
//! - Connection pooling with statement timeouts
//!
//! The schema (`bookings`, `amenities`, `booking_amenities`) is provisioned
//! outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use slotbook_postgres::{PostgresBookingStore, PostgresConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresBookingStore::connect(&PostgresConfig::with_url("postgres://localhost/slotbook")).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod store;

pub use config::PostgresConfig;
pub use store::{CREATE_TRANSACTION_SECONDS, PostgresBookingStore};
