//! Sensor device trait definition.
//!
//! [`SensorDevice`] is the primitive surface of an R503-class module: one
//! method per device instruction, no sequencing or policy. The state
//! machines that turn these primitives into enrollment and verification
//! live in [`crate::manager`].
//!
//! The trait uses native `async fn` methods (RPITIT), so it is not
//! object-safe; dynamic dispatch goes through the enum wrapper in
//! [`crate::devices`].

#![allow(async_fn_in_trait)]

use fingate_core::constants::{CHAR_BUFFER_1, CHAR_BUFFER_2};
use fingate_core::Result;
use fingate_protocol::{LedColor, LedMode};

/// The two per-scan character buffers inside the sensor.
///
/// A capture is converted into one of these; enrollment fills both and
/// merges them, verification only needs the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharBuffer {
    One,
    Two,
}

impl CharBuffer {
    /// Wire code for this buffer.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::One => CHAR_BUFFER_1,
            Self::Two => CHAR_BUFFER_2,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// A search hit: the matched slot and the sensor's confidence score.
///
/// The accuracy is the sensor's own opaque unit and is passed through
/// without normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Slot index of the matched template.
    pub slot: u16,

    /// Sensor-reported match confidence.
    pub accuracy: u16,
}

/// Primitive operations of an R503-class fingerprint module.
///
/// Every method is one command/reply round trip (the mock simulates the
/// same granularity). Implementations report "no finger" and "no match"
/// as ordinary values, not errors; errors are reserved for link and
/// device faults.
///
/// The bound is `Send` only: serial port handles are not `Sync`, and the
/// device always sits behind a `tokio::sync::Mutex`, which provides the
/// shared-access story without requiring `Sync` of the device itself.
pub trait SensorDevice: Send {
    /// Verify the device password. Returns whether the handshake passed.
    async fn verify_password(&mut self) -> Result<bool>;

    /// Attempt to capture an image. Returns `false` when no finger is on
    /// the window; this is the polling primitive behind the wait loops.
    async fn capture_image(&mut self) -> Result<bool>;

    /// Convert the last captured image into a character buffer.
    async fn convert_image(&mut self, buffer: CharBuffer) -> Result<()>;

    /// Search a character buffer against the whole template database.
    async fn search(&mut self, buffer: CharBuffer) -> Result<Option<SearchHit>>;

    /// Merge character buffers 1 and 2 into a template.
    async fn create_template(&mut self) -> Result<()>;

    /// Store the merged template at the given slot.
    async fn store_template(&mut self, slot: u16) -> Result<()>;

    /// Delete the template at the given slot.
    async fn delete_template(&mut self, slot: u16) -> Result<()>;

    /// Wipe the whole template database.
    async fn clear_database(&mut self) -> Result<()>;

    /// Number of templates currently stored. Always queried live, never
    /// cached host-side.
    async fn template_count(&mut self) -> Result<u16>;

    /// Maximum number of templates the sensor can hold.
    async fn capacity(&mut self) -> Result<u16>;

    /// Drive the aura LED ring.
    async fn set_led(&mut self, mode: LedMode, color: LedColor) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_buffer_codes() {
        assert_eq!(CharBuffer::One.code(), 0x01);
        assert_eq!(CharBuffer::Two.code(), 0x02);
    }
}
