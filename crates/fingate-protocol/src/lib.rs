//! Wire protocol for R503-class optical fingerprint sensors.
//!
//! This crate implements the byte-level command/reply format the sensor
//! speaks over its serial link, plus construction of LED control commands.
//! It is purely computational: no I/O happens here, the serial round trip
//! lives in `fingate-sensor`.
//!
//! # Wire Format
//!
//! Every command frame has the same skeleton:
//!
//! ```text
//! ┌────────┬─────────┬──────┬────────┬───────┬────────┬──────────┐
//! │ header │ address │ type │ length │ instr │ params │ checksum │
//! │ EF 01  │ 4 bytes │ 01   │ 2 (BE) │ 1     │ n      │ 2 (BE)   │
//! └────────┴─────────┴──────┴────────┴───────┴────────┴──────────┘
//! ```
//!
//! The length field counts instruction + parameters + the two checksum
//! bytes. The checksum is a plain 16-bit additive sum (not a CRC) of every
//! byte from the packet-type byte through the last parameter byte.
//!
//! Replies carry packet type `0x07` and a one-byte confirmation code in
//! place of the instruction; [`Reply::parse`] validates framing and
//! checksum before handing the code and payload to callers.
//!
//! # Example
//!
//! ```
//! use fingate_protocol::{CommandFrame, Instruction};
//! use fingate_core::constants::DEFAULT_ADDRESS;
//!
//! // "LED on, red": instruction 0x35, params (mode=On, 0, color=Red, 0)
//! let frame = CommandFrame::new(DEFAULT_ADDRESS, Instruction::AuraLedConfig, [2, 0, 1, 0]);
//! let bytes = frame.encode();
//! assert_eq!(bytes[0], 0xEF);
//! assert_eq!(bytes[1], 0x01);
//! ```

pub mod frame;
pub mod led;
pub mod reply;

pub use frame::{checksum, CommandFrame, Instruction, FRAME_HEADER, PACKET_ACK, PACKET_COMMAND};
pub use led::{led_command, LedColor, LedMode};
pub use reply::{ConfirmationCode, Reply};
