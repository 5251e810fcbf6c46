//! Sensor connection configuration.

use fingate_core::constants::{
    DEFAULT_ADDRESS, DEFAULT_BAUD_RATE, DEFAULT_PASSWORD, DEFAULT_PORT,
};
use serde::{Deserialize, Serialize};

/// Connection parameters for a sensor on a serial line.
///
/// The defaults match an R503 fresh from the factory.
///
/// # Examples
///
/// ```
/// use fingate_sensor::SensorConfig;
///
/// let config = SensorConfig::default();
/// assert_eq!(config.port, "/dev/ttyS0");
/// assert_eq!(config.baud_rate, 57_600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Serial device path.
    pub port: String,

    /// Line speed in baud.
    pub baud_rate: u32,

    /// Module address carried in every frame.
    pub address: u32,

    /// Handshake password verified on connect.
    pub password: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            address: DEFAULT_ADDRESS,
            password: DEFAULT_PASSWORD,
        }
    }
}
