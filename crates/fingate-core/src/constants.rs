//! Shared constants for the fingerprint sensor link and operation timing.
//!
//! Link defaults follow the R503 module documentation: all-ones device
//! address, zero password, 57600 baud. Timing values come from the sensor's
//! observed behaviour over serial; changing them affects how responsive the
//! wait loops feel, not correctness.

// ============================================================================
// Link Defaults
// ============================================================================

/// Default serial device path.
pub const DEFAULT_PORT: &str = "/dev/ttyS0";

/// Default serial baud rate for R503-class modules.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Default sensor address (broadcast all-ones).
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Default sensor password.
pub const DEFAULT_PASSWORD: u32 = 0x0000_0000;

// ============================================================================
// Character Buffers
// ============================================================================

/// First per-scan feature buffer (enrollment scan #1, verification scan).
pub const CHAR_BUFFER_1: u8 = 0x01;

/// Second per-scan feature buffer (enrollment scan #2).
pub const CHAR_BUFFER_2: u8 = 0x02;

// ============================================================================
// Timing (milliseconds)
// ============================================================================

/// Settle interval between writing a command frame and draining the reply.
pub const SETTLE_INTERVAL_MS: u64 = 100;

/// Delay between capture polls while waiting for a finger to arrive or leave.
pub const FINGER_POLL_INTERVAL_MS: u64 = 100;

/// Idle sleep of the continuous verification loop when no finger is present.
pub const IDLE_POLL_INTERVAL_MS: u64 = 100;

/// How long a terminal success/failure LED state is held before turning off.
pub const STATUS_HOLD_MS: u64 = 1_000;

/// Duration of the green/red flash reported after a connect attempt.
pub const CONNECT_FLASH_MS: u64 = 500;

/// Settle delay after the finger leaves the sensor window.
pub const REMOVAL_SETTLE_MS: u64 = 500;
