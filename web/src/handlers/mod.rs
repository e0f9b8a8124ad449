//! HTTP request handlers.

pub mod bookings;
pub mod health;

pub use bookings::{create_booking, list_bookings};
pub use health::health_check;
