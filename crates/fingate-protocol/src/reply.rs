//! Acknowledge packet parsing.
//!
//! The sensor answers every command with an acknowledge packet carrying a
//! one-byte confirmation code and an optional payload (search results,
//! template counts, system parameters). Parsing validates framing and the
//! additive checksum before anything is handed to callers; a malformed
//! packet surfaces as [`Error::Protocol`].

use crate::frame::{checksum, FRAME_HEADER, PACKET_ACK};
use bytes::Bytes;
use fingate_core::{Error, Result};

/// Confirmation codes the sensor reports in acknowledge packets.
///
/// The closed set covers the codes the driver acts on; anything else is
/// preserved verbatim in `Other` so diagnostics keep the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationCode {
    /// Command executed.
    Ok,

    /// Packet receive error.
    PacketError,

    /// No finger on the sensor window.
    NoFinger,

    /// Image capture failed.
    CaptureFail,

    /// Image too messy to characterize.
    ImageMessy,

    /// Too few feature points in the captured image.
    TooFewFeatures,

    /// Fingers in buffers 1 and 2 do not belong together.
    EnrollMismatch,

    /// Search found no matching template.
    NotFound,

    /// Slot outside the template database.
    BadLocation,

    /// Template deletion failed.
    DeleteFail,

    /// Database clear failed.
    ClearFail,

    /// Password verification failed.
    WrongPassword,

    /// No valid primary image in the buffer.
    NoValidImage,

    /// Flash write error.
    FlashError,

    /// Any code the driver has no dedicated handling for.
    Other(u8),
}

impl ConfirmationCode {
    /// Map a wire code to its confirmation variant.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Ok,
            0x01 => Self::PacketError,
            0x02 => Self::NoFinger,
            0x03 => Self::CaptureFail,
            0x06 => Self::ImageMessy,
            0x07 => Self::TooFewFeatures,
            0x0A => Self::EnrollMismatch,
            0x09 => Self::NotFound,
            0x0B => Self::BadLocation,
            0x10 => Self::DeleteFail,
            0x11 => Self::ClearFail,
            0x13 => Self::WrongPassword,
            0x15 => Self::NoValidImage,
            0x18 => Self::FlashError,
            other => Self::Other(other),
        }
    }

    /// Wire code for this confirmation.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::PacketError => 0x01,
            Self::NoFinger => 0x02,
            Self::CaptureFail => 0x03,
            Self::ImageMessy => 0x06,
            Self::TooFewFeatures => 0x07,
            Self::NotFound => 0x09,
            Self::EnrollMismatch => 0x0A,
            Self::BadLocation => 0x0B,
            Self::DeleteFail => 0x10,
            Self::ClearFail => 0x11,
            Self::WrongPassword => 0x13,
            Self::NoValidImage => 0x15,
            Self::FlashError => 0x18,
            Self::Other(code) => code,
        }
    }

    /// Whether this code reports success.
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Minimum acknowledge packet: header + address + type + length +
/// confirmation + checksum.
const MIN_REPLY_LEN: usize = 12;

/// A parsed acknowledge packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Address the sensor answered from.
    pub address: u32,

    /// Confirmation code.
    pub confirmation: ConfirmationCode,

    /// Payload bytes between the confirmation code and the checksum.
    pub payload: Bytes,
}

impl Reply {
    /// Parse an acknowledge packet from the drained serial buffer.
    ///
    /// # Errors
    /// Returns `Error::Protocol` for a short buffer, wrong header, wrong
    /// packet type, inconsistent length field, or checksum mismatch.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_REPLY_LEN {
            return Err(Error::protocol(format!(
                "Reply too short: {} bytes",
                bytes.len()
            )));
        }
        if bytes[0..2] != FRAME_HEADER {
            return Err(Error::protocol(format!(
                "Bad reply header: {:02X} {:02X}",
                bytes[0], bytes[1]
            )));
        }
        if bytes[6] != PACKET_ACK {
            return Err(Error::protocol(format!(
                "Unexpected packet type: 0x{:02X}",
                bytes[6]
            )));
        }

        let length = u16::from_be_bytes([bytes[7], bytes[8]]) as usize;
        let total = 9 + length;
        if length < 3 || bytes.len() < total {
            return Err(Error::protocol(format!(
                "Length field {} inconsistent with {} buffered bytes",
                length,
                bytes.len()
            )));
        }

        // Checksum covers packet type, length, confirmation, and payload.
        let expected = checksum(&bytes[6..total - 2]);
        let actual = u16::from_be_bytes([bytes[total - 2], bytes[total - 1]]);
        if expected != actual {
            return Err(Error::protocol(format!(
                "Checksum mismatch: expected 0x{expected:04X}, got 0x{actual:04X}"
            )));
        }

        Ok(Reply {
            address: u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            confirmation: ConfirmationCode::from_code(bytes[9]),
            payload: Bytes::copy_from_slice(&bytes[10..total - 2]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Build a well-formed ack packet for tests.
    fn ack(confirmation: u8, payload: &[u8]) -> Vec<u8> {
        let mut body = vec![PACKET_ACK];
        let length = (1 + payload.len() + 2) as u16;
        body.extend_from_slice(&length.to_be_bytes());
        body.push(confirmation);
        body.extend_from_slice(payload);
        let sum = checksum(&body);

        let mut out = Vec::new();
        out.extend_from_slice(&FRAME_HEADER);
        out.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        out.extend_from_slice(&body);
        out.extend_from_slice(&sum.to_be_bytes());
        out
    }

    #[test]
    fn test_parse_ok_reply() {
        let reply = Reply::parse(&ack(0x00, &[])).unwrap();
        assert_eq!(reply.address, 0xFFFF_FFFF);
        assert!(reply.confirmation.is_ok());
        assert!(reply.payload.is_empty());
    }

    #[test]
    fn test_parse_search_payload() {
        // Search hit: slot 3, accuracy 112
        let reply = Reply::parse(&ack(0x00, &[0x00, 0x03, 0x00, 0x70])).unwrap();
        assert_eq!(&reply.payload[..], &[0x00, 0x03, 0x00, 0x70]);
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        assert!(Reply::parse(&[0xEF, 0x01, 0xFF]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let mut bytes = ack(0x00, &[]);
        bytes[0] = 0xAA;
        assert!(matches!(
            Reply::parse(&bytes),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_parse_rejects_command_packet_type() {
        let mut bytes = ack(0x00, &[]);
        bytes[6] = 0x01;
        assert!(Reply::parse(&bytes).is_err());
    }

    #[test]
    fn test_parse_rejects_checksum_mismatch() {
        let mut bytes = ack(0x00, &[]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            Reply::parse(&bytes),
            Err(Error::Protocol(_))
        ));
    }

    #[rstest]
    #[case(0x00, ConfirmationCode::Ok)]
    #[case(0x02, ConfirmationCode::NoFinger)]
    #[case(0x09, ConfirmationCode::NotFound)]
    #[case(0x13, ConfirmationCode::WrongPassword)]
    #[case(0x42, ConfirmationCode::Other(0x42))]
    fn test_confirmation_round_trip(#[case] code: u8, #[case] expected: ConfirmationCode) {
        let parsed = ConfirmationCode::from_code(code);
        assert_eq!(parsed, expected);
        assert_eq!(parsed.code(), code);
    }
}
