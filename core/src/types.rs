//! Domain types for the booking system.
//!
//! Value objects are valid by construction: a `MemberName` is never empty,
//! a `PartySize` is never zero, and a `StartTime` never carries seconds.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a reference amenity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmenityId(Uuid);

impl AmenityId {
    /// Creates a new random `AmenityId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `AmenityId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AmenityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AmenityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Name of the member making a booking. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberName(String);

impl MemberName {
    /// Create a member name, returning `None` for an empty string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() { None } else { Some(Self(name)) }
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of people covered by a booking. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartySize(u32);

impl PartySize {
    /// Largest party size the `party_size INTEGER` column can hold.
    pub const MAX: u32 = i32::MAX.unsigned_abs();

    /// Create a party size, returning `None` for zero or values above [`Self::MAX`].
    #[must_use]
    pub const fn new(size: u32) -> Option<Self> {
        if size == 0 || size > Self::MAX {
            None
        } else {
            Some(Self(size))
        }
    }

    /// Get the number of people
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A party of one.
impl Default for PartySize {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time of day a booking starts, at minute precision.
///
/// Rendered as zero-padded 24-hour `HH:MM` in both directions, so a stored
/// `09:05:00` reads back as `"09:05"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartTime(NaiveTime);

impl StartTime {
    /// Wrap a time of day, dropping seconds and sub-seconds.
    #[must_use]
    pub fn new(time: NaiveTime) -> Self {
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    /// Build from hour and minute, `None` if out of range.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse `HH:MM` or `HH:MM:SS`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok()
            .map(Self::new)
    }

    /// Get the underlying time of day
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid start time: {raw}")))
    }
}

/// The (date, start time) pair bookings compete for capacity against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    /// Calendar date of the slot
    pub date: NaiveDate,
    /// Start time of the slot
    pub start_time: StartTime,
}

impl Slot {
    /// Create a slot
    #[must_use]
    pub const fn new(date: NaiveDate, start_time: StartTime) -> Self {
        Self { date, start_time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.start_time)
    }
}

/// Booking status.
///
/// Only `Active` is ever written. Other states are reserved for later
/// lifecycle work and are rejected when read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Counts toward slot capacity
    Active,
}

impl BookingStatus {
    /// Convert status to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }

    /// Parse status from its database string, `None` if unknown.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A validated booking request, ready for admission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBooking {
    /// Who is booking
    pub member_name: MemberName,
    /// Slot being booked
    pub slot: Slot,
    /// Number of people
    pub party_size: PartySize,
    /// Requested amenity names, not yet resolved against the reference set
    pub amenity_names: Vec<String>,
}

/// A persisted booking with its resolved amenity names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// Member name
    pub member_name: MemberName,
    /// Slot date
    pub date: NaiveDate,
    /// Slot start time (`HH:MM`)
    pub start_time: StartTime,
    /// Number of people
    pub party_size: PartySize,
    /// Status, always `active`
    pub status: BookingStatus,
    /// Resolved amenity names, alphabetical
    pub amenities: Vec<String>,
    /// Assigned by the store at insertion
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The slot this booking occupies
    #[must_use]
    pub const fn slot(&self) -> Slot {
        Slot::new(self.date, self.start_time)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn start_time_drops_seconds() {
        let time = StartTime::parse("09:05:00").unwrap();
        assert_eq!(time.to_string(), "09:05");

        let time = StartTime::parse("09:05:59").unwrap();
        assert_eq!(time, StartTime::from_hm(9, 5).unwrap());
    }

    #[test]
    fn start_time_rejects_garbage() {
        assert!(StartTime::parse("9am").is_none());
        assert!(StartTime::parse("25:00").is_none());
        assert!(StartTime::parse("").is_none());
    }

    #[test]
    fn start_time_serializes_as_hh_mm() {
        let json = serde_json::to_string(&StartTime::from_hm(7, 0).unwrap()).unwrap();
        assert_eq!(json, "\"07:00\"");
    }

    #[test]
    fn party_size_bounds() {
        assert!(PartySize::new(0).is_none());
        assert_eq!(PartySize::new(3).map(PartySize::get), Some(3));
        assert!(PartySize::new(PartySize::MAX).is_some());
        assert!(PartySize::new(PartySize::MAX + 1).is_none());
        assert_eq!(PartySize::default().get(), 1);
    }

    #[test]
    fn member_name_rejects_empty() {
        assert!(MemberName::new("").is_none());
        assert_eq!(MemberName::new("Ada").unwrap().as_str(), "Ada");
    }

    #[test]
    fn booking_serializes_camel_case() {
        let booking = Booking {
            id: BookingId::new(),
            member_name: MemberName::new("Ada").unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: StartTime::from_hm(9, 5).unwrap(),
            party_size: PartySize::new(2).unwrap(),
            status: BookingStatus::Active,
            amenities: vec!["parking".to_string()],
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["memberName"], "Ada");
        assert_eq!(value["date"], "2025-03-14");
        assert_eq!(value["startTime"], "09:05");
        assert_eq!(value["partySize"], 2);
        assert_eq!(value["status"], "active");
        assert_eq!(value["amenities"][0], "parking");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn status_round_trips_through_db_string() {
        assert_eq!(BookingStatus::parse(BookingStatus::Active.as_str()), Some(BookingStatus::Active));
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }
}
