//! Concrete device dispatch.
//!
//! [`SensorDevice`] uses native async methods and therefore cannot be
//! boxed behind `dyn`. [`AnySensorDevice`] wraps the known implementations
//! in an enum and delegates each call, which is what the manager and the
//! watch loop hold behind their shared mutex.

use crate::mock::MockSensor;
use crate::serial::SerialSensor;
use crate::traits::{CharBuffer, SearchHit, SensorDevice};
use fingate_core::Result;
use fingate_protocol::{LedColor, LedMode};

/// Any sensor device the service can drive.
#[derive(Debug)]
pub enum AnySensorDevice {
    /// Hardware sensor on a serial line.
    Serial(SerialSensor),

    /// In-memory simulation for development and tests.
    Mock(MockSensor),
}

impl SensorDevice for AnySensorDevice {
    async fn verify_password(&mut self) -> Result<bool> {
        match self {
            Self::Serial(device) => device.verify_password().await,
            Self::Mock(device) => device.verify_password().await,
        }
    }

    async fn capture_image(&mut self) -> Result<bool> {
        match self {
            Self::Serial(device) => device.capture_image().await,
            Self::Mock(device) => device.capture_image().await,
        }
    }

    async fn convert_image(&mut self, buffer: CharBuffer) -> Result<()> {
        match self {
            Self::Serial(device) => device.convert_image(buffer).await,
            Self::Mock(device) => device.convert_image(buffer).await,
        }
    }

    async fn search(&mut self, buffer: CharBuffer) -> Result<Option<SearchHit>> {
        match self {
            Self::Serial(device) => device.search(buffer).await,
            Self::Mock(device) => device.search(buffer).await,
        }
    }

    async fn create_template(&mut self) -> Result<()> {
        match self {
            Self::Serial(device) => device.create_template().await,
            Self::Mock(device) => device.create_template().await,
        }
    }

    async fn store_template(&mut self, slot: u16) -> Result<()> {
        match self {
            Self::Serial(device) => device.store_template(slot).await,
            Self::Mock(device) => device.store_template(slot).await,
        }
    }

    async fn delete_template(&mut self, slot: u16) -> Result<()> {
        match self {
            Self::Serial(device) => device.delete_template(slot).await,
            Self::Mock(device) => device.delete_template(slot).await,
        }
    }

    async fn clear_database(&mut self) -> Result<()> {
        match self {
            Self::Serial(device) => device.clear_database().await,
            Self::Mock(device) => device.clear_database().await,
        }
    }

    async fn template_count(&mut self) -> Result<u16> {
        match self {
            Self::Serial(device) => device.template_count().await,
            Self::Mock(device) => device.template_count().await,
        }
    }

    async fn capacity(&mut self) -> Result<u16> {
        match self {
            Self::Serial(device) => device.capacity().await,
            Self::Mock(device) => device.capacity().await,
        }
    }

    async fn set_led(&mut self, mode: LedMode, color: LedColor) -> Result<()> {
        match self {
            Self::Serial(device) => device.set_led(mode, color).await,
            Self::Mock(device) => device.set_led(mode, color).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_dispatch() {
        let (mock, handle) = MockSensor::new();
        let mut device = AnySensorDevice::Mock(mock);

        assert!(device.verify_password().await.unwrap());
        assert!(!device.capture_image().await.unwrap());

        handle.queue_scan(b"ridge".to_vec());
        assert!(device.capture_image().await.unwrap());
    }
}
