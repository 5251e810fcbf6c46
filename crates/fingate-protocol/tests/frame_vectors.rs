//! Byte-exact wire format vectors captured from the sensor documentation.

use fingate_core::constants::DEFAULT_ADDRESS;
use fingate_protocol::{
    checksum, led_command, CommandFrame, ConfirmationCode, Instruction, LedColor, LedMode, Reply,
};

/// The published "LED on, red" frame, byte for byte.
#[test]
fn led_on_red_published_vector() {
    let frame = led_command(DEFAULT_ADDRESS, LedMode::On, LedColor::Red);
    let bytes = frame.encode();
    assert_eq!(
        &bytes[..],
        &[
            0xEF, 0x01, // header
            0xFF, 0xFF, 0xFF, 0xFF, // address
            0x01, // command packet
            0x00, 0x07, // length
            0x35, // AuraLedConfig
            0x02, 0x00, 0x01, 0x00, // mode=On, 0, color=Red, 0
            0x00, 0x40, // checksum
        ]
    );
}

#[test]
fn checksum_covers_type_through_params() {
    let bytes = led_command(DEFAULT_ADDRESS, LedMode::On, LedColor::Red).encode();
    let sum = checksum(&bytes[6..bytes.len() - 2]);
    let trailer = u16::from_be_bytes([bytes[bytes.len() - 2], bytes[bytes.len() - 1]]);
    assert_eq!(sum, trailer);
}

#[test]
fn verify_password_frame() {
    let frame = CommandFrame::new(
        DEFAULT_ADDRESS,
        Instruction::VfyPwd,
        0x0000_0000u32.to_be_bytes(),
    );
    let bytes = frame.encode();
    assert_eq!(
        &bytes[..],
        &[
            0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x07, 0x13, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x1B,
        ]
    );
}

#[test]
fn capture_frame_has_no_params() {
    let bytes = CommandFrame::new(DEFAULT_ADDRESS, Instruction::GenImg, []).encode();
    assert_eq!(&bytes[7..10], &[0x00, 0x03, 0x01]);
    assert_eq!(bytes.len(), 12);
}

#[test]
fn encode_then_parse_ack() {
    // Fabricate the ack a sensor would produce for a successful store.
    let payload: &[u8] = &[];
    let mut body = vec![0x07u8, 0x00, 0x03, 0x00];
    body.extend_from_slice(payload);
    let sum = checksum(&body);

    let mut wire = vec![0xEF, 0x01];
    wire.extend_from_slice(&DEFAULT_ADDRESS.to_be_bytes());
    wire.extend_from_slice(&body);
    wire.extend_from_slice(&sum.to_be_bytes());

    let reply = Reply::parse(&wire).unwrap();
    assert_eq!(reply.confirmation, ConfirmationCode::Ok);
    assert_eq!(reply.address, DEFAULT_ADDRESS);
}
