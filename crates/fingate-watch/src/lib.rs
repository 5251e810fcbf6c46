//! Continuous background verification for the fingate fingerprint service.
//!
//! While no foreground operation is in progress, the service keeps
//! watching the sensor window: any finger that shows up is verified
//! against the template database, the outcome is flashed on the LED ring,
//! and a [`WatchEvent`] is pushed to the owner's channel. Matched slots
//! are resolved to host-side metadata (a display name and an optional
//! action) and the action is dispatched without blocking the loop.
//!
//! The watcher shares the device mutex handed out by
//! [`fingate_sensor::SensorManager::device_handle`], acquiring it once
//! per iteration. Foreground operations therefore preempt the loop simply
//! by locking the device; no coordination protocol is needed.

pub mod events;
pub mod metadata;
pub mod watcher;

pub use events::{EventKind, EventStatus, WatchEvent};
pub use metadata::{ActionExecutor, FingerMeta, MetadataLookup, NO_ACTION};
pub use watcher::Watcher;
