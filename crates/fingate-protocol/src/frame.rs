//! Command frame construction and checksum computation.

use bytes::{BufMut, Bytes, BytesMut};

/// Two-byte frame header preceding every packet in either direction.
pub const FRAME_HEADER: [u8; 2] = [0xEF, 0x01];

/// Packet type byte for host-to-sensor command packets.
pub const PACKET_COMMAND: u8 = 0x01;

/// Packet type byte for sensor-to-host acknowledge packets.
pub const PACKET_ACK: u8 = 0x07;

/// Instruction codes understood by R503-class sensors.
///
/// Raw integer codes are confined to [`Instruction::code`]; everything
/// above the wire-encode step works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Capture an image of the finger on the sensor window.
    GenImg,

    /// Convert the captured image into a character buffer.
    Img2Tz,

    /// Search a character buffer against the template database.
    Search,

    /// Merge character buffers 1 and 2 into a template.
    RegModel,

    /// Store the merged template at a slot.
    Store,

    /// Delete templates starting at a slot.
    DeleteChar,

    /// Wipe the whole template database.
    Empty,

    /// Read system parameters (status, capacity, packet size).
    ReadSysPara,

    /// Verify the device password (connection handshake).
    VfyPwd,

    /// Read the number of stored templates.
    TemplateNum,

    /// Control the aura LED ring.
    AuraLedConfig,
}

impl Instruction {
    /// Wire code for this instruction.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::GenImg => 0x01,
            Self::Img2Tz => 0x02,
            Self::Search => 0x04,
            Self::RegModel => 0x05,
            Self::Store => 0x06,
            Self::DeleteChar => 0x0C,
            Self::Empty => 0x0D,
            Self::ReadSysPara => 0x0F,
            Self::VfyPwd => 0x13,
            Self::TemplateNum => 0x1D,
            Self::AuraLedConfig => 0x35,
        }
    }
}

/// Compute the 16-bit additive checksum over the given bytes.
///
/// The sensor checksums every byte from the packet-type byte through the
/// last parameter byte, wrapping on overflow, emitted big-endian.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)))
}

/// A single command frame addressed to one sensor.
///
/// Encoding is deterministic: identical instruction and parameters always
/// produce an identical byte sequence.
///
/// # Example
///
/// ```
/// use fingate_protocol::{CommandFrame, Instruction};
///
/// let frame = CommandFrame::new(0xFFFF_FFFF, Instruction::GenImg, []);
/// assert_eq!(frame.encode().len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    address: u32,
    instruction: Instruction,
    params: Vec<u8>,
}

impl CommandFrame {
    /// Create a command frame.
    pub fn new(address: u32, instruction: Instruction, params: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            instruction,
            params: params.into(),
        }
    }

    /// The instruction this frame carries.
    #[must_use]
    pub fn instruction(&self) -> Instruction {
        self.instruction
    }

    /// Encode the frame into its wire byte sequence.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        // Body = packet type + length + instruction + params; this is the
        // exact range the checksum covers.
        let length = (1 + self.params.len() + 2) as u16;
        let mut body = BytesMut::with_capacity(4 + self.params.len());
        body.put_u8(PACKET_COMMAND);
        body.put_u16(length);
        body.put_u8(self.instruction.code());
        body.put_slice(&self.params);

        let sum = checksum(&body);

        let mut out = BytesMut::with_capacity(6 + body.len() + 2);
        out.put_slice(&FRAME_HEADER);
        out.put_u32(self.address);
        out.put_slice(&body);
        out.put_u16(sum);
        out.freeze()
    }
}
