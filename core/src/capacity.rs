//! Per-slot capacity rule.
//!
//! The guard is a pure decision over a slot total that the caller has already
//! read. Stores apply it inside their write transaction while holding the
//! slot lock; [`crate::service::BookingService::check_capacity`] applies it
//! as an unlocked pre-check.

use crate::error::BookingError;
use crate::types::PartySize;

/// Maximum number of people per slot.
pub const SLOT_CAPACITY: u32 = 6;

/// Outcome of a capacity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The party fits.
    Admit,
    /// The slot would exceed capacity.
    Reject,
}

impl Admission {
    /// True if the party was admitted
    #[must_use]
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Decides whether a party may join a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityGuard {
    capacity: u32,
}

impl CapacityGuard {
    /// Create a guard with a custom per-slot capacity.
    #[must_use]
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Per-slot capacity enforced by this guard
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Admit iff `current_total + requested <= capacity`.
    #[must_use]
    pub fn admit(&self, current_total: u64, requested: PartySize) -> Admission {
        let total = current_total.saturating_add(u64::from(requested.get()));
        if total <= u64::from(self.capacity) {
            Admission::Admit
        } else {
            Admission::Reject
        }
    }

    /// Like [`Self::admit`], but a rejection is the error callers surface.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::CapacityExceeded`] if the party does not fit.
    pub fn check(&self, current_total: u64, requested: PartySize) -> Result<(), BookingError> {
        match self.admit(current_total, requested) {
            Admission::Admit => Ok(()),
            Admission::Reject => Err(self.rejection()),
        }
    }

    /// The error returned for a full slot.
    #[must_use]
    pub const fn rejection(&self) -> BookingError {
        BookingError::CapacityExceeded {
            capacity: self.capacity,
        }
    }
}

impl Default for CapacityGuard {
    fn default() -> Self {
        Self::new(SLOT_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size(n: u32) -> PartySize {
        PartySize::new(n).unwrap()
    }

    #[test]
    fn boundary_at_five() {
        let guard = CapacityGuard::default();
        assert_eq!(guard.admit(5, size(1)), Admission::Admit);
        assert_eq!(guard.admit(5, size(2)), Admission::Reject);
    }

    #[test]
    fn empty_slot_takes_full_party() {
        let guard = CapacityGuard::default();
        assert!(guard.admit(0, size(6)).is_admitted());
        assert!(!guard.admit(0, size(7)).is_admitted());
    }

    #[test]
    fn check_returns_exact_message() {
        let err = CapacityGuard::default().check(6, size(1)).unwrap_err();
        assert_eq!(err.to_string(), "This time slot is full. Max 6 people per slot.");
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let guard = CapacityGuard::default();
        assert_eq!(guard.admit(u64::MAX, size(PartySize::MAX)), Admission::Reject);
    }

    proptest! {
        #[test]
        fn admits_exactly_when_within_capacity(total in 0u64..20, requested in 1u32..20, capacity in 0u32..20) {
            let guard = CapacityGuard::new(capacity);
            let admitted = guard.admit(total, size(requested)).is_admitted();
            prop_assert_eq!(admitted, total + u64::from(requested) <= u64::from(capacity));
        }
    }
}
