use crate::error::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a template inside sensor nonvolatile storage.
///
/// Slots are never cached by the host: counts and positions are always
/// queried live from the device, and a `TemplateSlot` is only constructed
/// from values the sensor itself reported or validated against its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateSlot(u16);

impl TemplateSlot {
    /// Create a slot, validating it against the sensor capacity.
    ///
    /// # Errors
    /// Returns `Error::DeviceRejected` if the index is outside `[0, capacity)`.
    pub fn new(index: u16, capacity: u16) -> Result<Self> {
        if index >= capacity {
            return Err(Error::rejected(format!(
                "Slot {index} outside capacity {capacity}"
            )));
        }
        Ok(TemplateSlot(index))
    }

    /// Get the raw slot index.
    #[must_use]
    pub fn index(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TemplateSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of an enrollment operation.
///
/// Exactly one variant is produced per call; internal faults are folded
/// into `Failed` rather than escaping as panics or raw errors.
#[derive(Debug)]
pub enum EnrollOutcome {
    /// Template stored at the given slot.
    Enrolled(TemplateSlot),

    /// The scanned finger already exists at this slot. The slot is the
    /// *matched* position, never the slot the enrollment would have used.
    AlreadyExists(TemplateSlot),

    /// Enrollment failed (capacity, link, or device fault).
    Failed(Error),
}

impl EnrollOutcome {
    /// Whether the enrollment stored a new template.
    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        matches!(self, Self::Enrolled(_))
    }
}

/// Outcome of a verification operation.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// The finger matched a stored template.
    Match {
        slot: TemplateSlot,
        /// Sensor-reported confidence in its own units, no normalization.
        accuracy: u16,
    },

    /// No stored template matched the finger.
    NoMatch,

    /// Verification failed before a search result was produced.
    Failed(Error),
}

impl VerifyOutcome {
    /// Whether the verification found a match.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Outcome of a delete operation.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// Template removed from the given slot.
    Deleted(TemplateSlot),

    /// Verify-then-delete found no finger to delete; no device delete call
    /// was made.
    NotFound,

    /// The device declined the deletion or the link failed.
    Failed(Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 200, true)]
    #[case(199, 200, true)]
    #[case(200, 200, false)]
    #[case(5, 5, false)]
    fn test_template_slot_bounds(#[case] index: u16, #[case] capacity: u16, #[case] ok: bool) {
        assert_eq!(TemplateSlot::new(index, capacity).is_ok(), ok);
    }

    #[test]
    fn test_template_slot_display() {
        let slot = TemplateSlot::new(42, 200).unwrap();
        assert_eq!(slot.to_string(), "42");
        assert_eq!(slot.index(), 42);
    }

    #[test]
    fn test_enroll_outcome_helpers() {
        let slot = TemplateSlot::new(3, 200).unwrap();
        assert!(EnrollOutcome::Enrolled(slot).is_enrolled());
        assert!(!EnrollOutcome::AlreadyExists(slot).is_enrolled());
        assert!(!EnrollOutcome::Failed(Error::NotFound).is_enrolled());
    }

    #[test]
    fn test_verify_outcome_helpers() {
        let slot = TemplateSlot::new(1, 200).unwrap();
        assert!(VerifyOutcome::Match { slot, accuracy: 97 }.is_match());
        assert!(!VerifyOutcome::NoMatch.is_match());
    }
}
