//! Aura LED ring control commands.
//!
//! The R503's LED ring is driven with a single instruction (0x35) carrying
//! `(mode, 0, color, 0)` as parameters. Modes and colors are closed sets;
//! their raw wire codes never leave this module except inside an encoded
//! frame.

use crate::frame::{CommandFrame, Instruction};

/// LED display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    /// Continuous blinking.
    Blink,

    /// Solid on.
    On,

    /// Off.
    Off,
}

impl LedMode {
    /// Wire code for this mode.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Blink => 1,
            Self::On => 2,
            Self::Off => 4,
        }
    }
}

/// LED ring colors supported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Red,
    Blue,
    Purple,
    Green,
    GreenYellow,
    LightBlue,
    White,
}

impl LedColor {
    /// Wire code for this color.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Blue => 2,
            Self::Purple => 3,
            Self::Green => 4,
            Self::GreenYellow => 5,
            Self::LightBlue => 6,
            Self::White => 7,
        }
    }
}

/// Build the LED control frame for a `(mode, color)` pair.
///
/// # Example
///
/// ```
/// use fingate_protocol::{led_command, LedColor, LedMode};
/// use fingate_core::constants::DEFAULT_ADDRESS;
///
/// let frame = led_command(DEFAULT_ADDRESS, LedMode::On, LedColor::Red);
/// let bytes = frame.encode();
/// assert_eq!(bytes[9], 0x35);
/// ```
#[must_use]
pub fn led_command(address: u32, mode: LedMode, color: LedColor) -> CommandFrame {
    CommandFrame::new(
        address,
        Instruction::AuraLedConfig,
        [mode.code(), 0, color.code(), 0],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LedMode::Blink, 1)]
    #[case(LedMode::On, 2)]
    #[case(LedMode::Off, 4)]
    fn test_mode_codes(#[case] mode: LedMode, #[case] code: u8) {
        assert_eq!(mode.code(), code);
    }

    #[rstest]
    #[case(LedColor::Red, 1)]
    #[case(LedColor::Blue, 2)]
    #[case(LedColor::Purple, 3)]
    #[case(LedColor::Green, 4)]
    #[case(LedColor::GreenYellow, 5)]
    #[case(LedColor::LightBlue, 6)]
    #[case(LedColor::White, 7)]
    fn test_color_codes(#[case] color: LedColor, #[case] code: u8) {
        assert_eq!(color.code(), code);
    }

    #[test]
    fn test_led_command_params() {
        let bytes = led_command(0xFFFF_FFFF, LedMode::Blink, LedColor::Purple).encode();
        assert_eq!(&bytes[10..14], &[1, 0, 3, 0]);
    }
}
