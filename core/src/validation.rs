//! Request payload validation.
//!
//! [`CreateBookingRequest`] keeps every field as raw JSON so that shape
//! leniency is decided here and not by serde: `partySize` may arrive as a
//! number or a numeric string, and a non-array `amenities` is treated as
//! empty instead of failing the request.
//!
//! A positive party size that cannot be stored (fractional, or beyond the
//! `INTEGER` column) is still a request for that many people: if it exceeds
//! the slot capacity the request gets the capacity rejection, otherwise the
//! party-size message.

use crate::capacity::CapacityGuard;
use crate::error::BookingError;
use crate::types::{MemberName, NewBooking, PartySize, Slot, StartTime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message for a missing member name, date, or start time.
pub const REQUIRED_FIELDS_MESSAGE: &str = "memberName, date, and startTime are required";

/// Message for a party size that is not a positive whole number.
pub const PARTY_SIZE_MESSAGE: &str = "partySize must be a positive number";

/// Message for a date that is not `YYYY-MM-DD`.
pub const DATE_FORMAT_MESSAGE: &str = "date must be a calendar date (YYYY-MM-DD)";

/// Message for a start time that is not `HH:MM`.
pub const START_TIME_FORMAT_MESSAGE: &str = "startTime must be a time of day (HH:MM)";

/// Raw `POST /api/bookings` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Member name, must be a non-empty string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_name: Option<Value>,
    /// Date as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    /// Start time as `HH:MM` or `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    /// Party size, defaults to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<Value>,
    /// Candidate amenity names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Value>,
}

impl CreateBookingRequest {
    /// Normalize the payload into a [`NewBooking`].
    ///
    /// Checks run in order: required fields, party size, date, start time.
    /// `guard` only decides how an unstorable party size is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] with the message for the first
    /// failing check, or [`BookingError::CapacityExceeded`] for an unstorable
    /// party size larger than the guard's capacity.
    pub fn validate(self, guard: CapacityGuard) -> Result<NewBooking, BookingError> {
        let (Some(member_name), Some(date), Some(start_time)) = (
            non_empty_string(self.member_name).and_then(MemberName::new),
            non_empty_string(self.date),
            non_empty_string(self.start_time),
        ) else {
            return Err(BookingError::validation(REQUIRED_FIELDS_MESSAGE));
        };

        let party_size = parse_party_size(self.party_size.as_ref(), guard)?;

        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| BookingError::validation(DATE_FORMAT_MESSAGE))?;
        let start_time = StartTime::parse(&start_time)
            .ok_or_else(|| BookingError::validation(START_TIME_FORMAT_MESSAGE))?;

        Ok(NewBooking {
            member_name,
            slot: Slot::new(date, start_time),
            party_size,
            amenity_names: amenity_names(self.amenities),
        })
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Absent, `null`, and blank strings mean a party of one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked before the cast
fn parse_party_size(value: Option<&Value>, guard: CapacityGuard) -> Result<PartySize, BookingError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(PartySize::default()),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(PartySize::default()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    };

    let Some(requested) = raw.filter(|n| n.is_finite() && *n > 0.0) else {
        return Err(BookingError::validation(PARTY_SIZE_MESSAGE));
    };

    if requested.fract() == 0.0 && requested <= f64::from(PartySize::MAX) {
        if let Some(size) = PartySize::new(requested as u32) {
            return Ok(size);
        }
    }

    if requested > f64::from(guard.capacity()) {
        Err(guard.rejection())
    } else {
        Err(BookingError::validation(PARTY_SIZE_MESSAGE))
    }
}

fn amenity_names(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
