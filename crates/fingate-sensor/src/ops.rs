//! Shared capture and LED routines.
//!
//! These helpers run with the device lock already held and provide the
//! user-facing rhythm of every operation: blink blue while waiting for a
//! finger, blink purple until it is lifted, flash a terminal color long
//! enough to read. LED calls are advisory and never fail the operation
//! that issued them.

use crate::traits::SensorDevice;
use fingate_core::constants::{FINGER_POLL_INTERVAL_MS, REMOVAL_SETTLE_MS};
use fingate_core::Result;
use fingate_protocol::{LedColor, LedMode};
use std::time::Duration;

/// Blink blue and poll until a finger is captured.
///
/// Returns once the sensor holds a fresh image; the LED is left solid
/// blue to acknowledge the capture.
pub async fn wait_for_finger(device: &mut impl SensorDevice) -> Result<()> {
    device.set_led(LedMode::Blink, LedColor::Blue).await.ok();
    loop {
        if device.capture_image().await? {
            break;
        }
        tokio::time::sleep(Duration::from_millis(FINGER_POLL_INTERVAL_MS)).await;
    }
    device.set_led(LedMode::On, LedColor::Blue).await.ok();
    Ok(())
}

/// Blink purple and poll until the finger leaves the window.
///
/// A short settle pause follows the last "no finger" reading so a finger
/// mid-lift is not immediately recaptured.
pub async fn wait_finger_removed(device: &mut impl SensorDevice) -> Result<()> {
    device.set_led(LedMode::Blink, LedColor::Purple).await.ok();
    loop {
        if !device.capture_image().await? {
            break;
        }
        tokio::time::sleep(Duration::from_millis(FINGER_POLL_INTERVAL_MS)).await;
    }
    led_off(device).await;
    tokio::time::sleep(Duration::from_millis(REMOVAL_SETTLE_MS)).await;
    Ok(())
}

/// Turn the LED ring off.
pub async fn led_off(device: &mut impl SensorDevice) {
    device.set_led(LedMode::Off, LedColor::Blue).await.ok();
}

/// Show a solid color for `hold_ms`, then turn the ring off.
pub async fn flash_status(device: &mut impl SensorDevice, color: LedColor, hold_ms: u64) {
    device.set_led(LedMode::On, color).await.ok();
    tokio::time::sleep(Duration::from_millis(hold_ms)).await;
    led_off(device).await;
}

/// Blink a color for `hold_ms`, then turn the ring off.
pub async fn blink_status(device: &mut impl SensorDevice, color: LedColor, hold_ms: u64) {
    device.set_led(LedMode::Blink, color).await.ok();
    tokio::time::sleep(Duration::from_millis(hold_ms)).await;
    led_off(device).await;
}
