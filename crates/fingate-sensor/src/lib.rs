//! Sensor device layer for the fingate fingerprint service.
//!
//! This crate owns everything that talks to the sensor: the
//! [`SensorDevice`] trait describing the primitive operations an
//! R503-class module offers, a serial implementation speaking the
//! `fingate-protocol` wire format, a mock for development and testing,
//! and the [`SensorManager`] that sequences primitives into the
//! user-facing operations (enroll, verify, delete, count, clear).
//!
//! # Exclusive Access
//!
//! The sensor is a singleton resource: at most one logical operation may
//! be in flight against it at any instant, and the hardware does not
//! enforce this; the host must. The manager wraps the device in one
//! `tokio::sync::Mutex` and holds it for the full duration of each
//! operation. The continuous verification loop in `fingate-watch` shares
//! the same handle and acquires it once per iteration, so foreground
//! requests interleave between iterations, never mid-iteration. This is
//! also what makes two-scan enrollment safe: the target slot is read at
//! the start of the operation and cannot be raced by a second enrollment.
//!
//! # LED Feedback
//!
//! Every operation drives the aura LED to a terminal, human-legible state
//! before returning: green for success, red for errors and misses, purple
//! blink for duplicates. LED feedback is advisory: failures to set it
//! are swallowed and never fail a logical operation.
//!
//! # Example
//!
//! ```no_run
//! use fingate_sensor::{AnySensorDevice, SensorConfig, SensorManager, SerialSensor};
//!
//! #[tokio::main]
//! async fn main() -> fingate_core::Result<()> {
//!     let config = SensorConfig::default();
//!     let device = SerialSensor::open(&config)?;
//!     let manager = SensorManager::new(config, AnySensorDevice::Serial(device));
//!
//!     if manager.connect().await {
//!         let outcome = manager.enroll().await;
//!         println!("Enroll: {:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod devices;
pub mod mock;
pub mod manager;
pub mod ops;
pub mod serial;
pub mod traits;

pub use config::SensorConfig;
pub use devices::AnySensorDevice;
pub use manager::SensorManager;
pub use mock::{MockSensor, MockSensorHandle};
pub use serial::SerialSensor;
pub use traits::{CharBuffer, SearchHit, SensorDevice};
