//! Operation sequencing over an exclusive device handle.
//!
//! [`SensorManager`] turns the device primitives into the five logical
//! operations: enroll, verify, delete, count, and clear. Each operation
//! acquires the shared device mutex once and holds it until its state
//! machine reaches a terminal state, so concurrent callers serialize at
//! operation granularity and no interleaving can corrupt a multi-step
//! sequence.
//!
//! Operations never return raw `Result`s to callers: every internal fault
//! is folded into the operation's outcome enum with the LED already set
//! to a terminal state.

use crate::config::SensorConfig;
use crate::devices::AnySensorDevice;
use crate::ops::{blink_status, flash_status, led_off, wait_finger_removed, wait_for_finger};
use crate::traits::{CharBuffer, SensorDevice};
use fingate_core::constants::{CONNECT_FLASH_MS, STATUS_HOLD_MS};
use fingate_core::{
    DeleteOutcome, EnrollOutcome, Error, Result, TemplateSlot, VerifyOutcome,
};
use fingate_protocol::{LedColor, LedMode};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Sequences logical fingerprint operations over one exclusive device.
#[derive(Debug)]
pub struct SensorManager {
    device: Arc<Mutex<AnySensorDevice>>,
    config: SensorConfig,
}

impl SensorManager {
    /// Wrap a device in a manager.
    #[must_use]
    pub fn new(config: SensorConfig, device: AnySensorDevice) -> Self {
        SensorManager {
            device: Arc::new(Mutex::new(device)),
            config,
        }
    }

    /// Connection parameters this manager was built with.
    #[must_use]
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Shared handle to the device, for the continuous verification loop.
    #[must_use]
    pub fn device_handle(&self) -> Arc<Mutex<AnySensorDevice>> {
        Arc::clone(&self.device)
    }

    /// Verify the device password and flash the result.
    ///
    /// Green means the sensor answered and accepted the password; red
    /// covers both a rejected password and a dead link.
    pub async fn connect(&self) -> bool {
        let mut device = self.device.lock().await;
        match device.verify_password().await {
            Ok(true) => {
                info!(port = %self.config.port, "Sensor handshake passed");
                flash_status(&mut *device, LedColor::Green, CONNECT_FLASH_MS).await;
                true
            }
            Ok(false) => {
                warn!(port = %self.config.port, "Sensor rejected password");
                flash_status(&mut *device, LedColor::Red, CONNECT_FLASH_MS).await;
                false
            }
            Err(err) => {
                error!(port = %self.config.port, %err, "Sensor handshake failed");
                flash_status(&mut *device, LedColor::Red, CONNECT_FLASH_MS).await;
                false
            }
        }
    }

    /// Enroll a new fingerprint with two scans and a duplicate check.
    ///
    /// The finger is scanned twice (with a mandatory lift in between),
    /// the second scan is searched against the database, and only a
    /// novel finger is merged and stored. On a duplicate the outcome
    /// carries the slot of the *existing* template.
    pub async fn enroll(&self) -> EnrollOutcome {
        let mut device = self.device.lock().await;
        match Self::enroll_inner(&mut device).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, "Enrollment failed");
                device.set_led(LedMode::On, LedColor::Red).await.ok();
                EnrollOutcome::Failed(err)
            }
        }
    }

    async fn enroll_inner(device: &mut AnySensorDevice) -> Result<EnrollOutcome> {
        let capacity = device.capacity().await?;
        let count = device.template_count().await?;
        if count >= capacity {
            warn!(count, capacity, "Enrollment refused: storage full");
            device.set_led(LedMode::On, LedColor::Red).await.ok();
            return Ok(EnrollOutcome::Failed(Error::CapacityExceeded {
                count,
                capacity,
            }));
        }
        // The next free slot. Safe to read this early: the device lock is
        // held for the whole operation, so no other enrollment can take it.
        let slot = TemplateSlot::new(count, capacity)?;

        wait_for_finger(device).await?;
        device.convert_image(CharBuffer::One).await?;
        wait_finger_removed(device).await?;

        wait_for_finger(device).await?;
        device.convert_image(CharBuffer::Two).await?;

        if let Some(hit) = device.search(CharBuffer::Two).await? {
            let existing = TemplateSlot::new(hit.slot, capacity)?;
            info!(slot = %existing, "Enrollment found existing template");
            blink_status(device, LedColor::Purple, STATUS_HOLD_MS).await;
            wait_finger_removed(device).await?;
            return Ok(EnrollOutcome::AlreadyExists(existing));
        }

        device.create_template().await?;
        device.store_template(slot.index()).await?;
        info!(slot = %slot, "Template enrolled");

        flash_status(device, LedColor::Green, STATUS_HOLD_MS).await;
        wait_finger_removed(device).await?;
        Ok(EnrollOutcome::Enrolled(slot))
    }

    /// Verify a finger against the template database.
    ///
    /// Waits for a finger, searches, reports match or miss on the LED,
    /// and waits for the finger to be lifted on both paths so back-to-back
    /// calls cannot reread the same placement.
    pub async fn verify(&self) -> VerifyOutcome {
        let mut device = self.device.lock().await;
        match Self::verify_inner(&mut device).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, "Verification failed");
                device.set_led(LedMode::On, LedColor::Red).await.ok();
                VerifyOutcome::Failed(err)
            }
        }
    }

    async fn verify_inner(device: &mut AnySensorDevice) -> Result<VerifyOutcome> {
        wait_for_finger(device).await?;
        device.convert_image(CharBuffer::One).await?;

        let outcome = match device.search(CharBuffer::One).await? {
            Some(hit) => {
                let capacity = device.capacity().await?;
                let slot = TemplateSlot::new(hit.slot, capacity)?;
                info!(slot = %slot, accuracy = hit.accuracy, "Fingerprint matched");
                flash_status(device, LedColor::Green, STATUS_HOLD_MS).await;
                VerifyOutcome::Match {
                    slot,
                    accuracy: hit.accuracy,
                }
            }
            None => {
                info!("Fingerprint not recognized");
                blink_status(device, LedColor::Red, STATUS_HOLD_MS).await;
                VerifyOutcome::NoMatch
            }
        };

        wait_finger_removed(device).await?;
        Ok(outcome)
    }

    /// Delete a template, by slot or by finger.
    ///
    /// With `Some(slot)` the slot is validated against the capacity and
    /// deleted directly. With `None` a full verification runs first and
    /// the matched slot is deleted; a miss returns `NotFound` without
    /// touching the database.
    pub async fn delete(&self, slot: Option<u16>) -> DeleteOutcome {
        let target = match slot {
            Some(index) => index,
            None => match self.verify().await {
                VerifyOutcome::Match { slot, .. } => slot.index(),
                VerifyOutcome::NoMatch => return DeleteOutcome::NotFound,
                VerifyOutcome::Failed(err) => return DeleteOutcome::Failed(err),
            },
        };

        let mut device = self.device.lock().await;
        match Self::delete_inner(&mut device, target).await {
            Ok(deleted) => DeleteOutcome::Deleted(deleted),
            Err(err) => {
                error!(slot = target, %err, "Deletion failed");
                device.set_led(LedMode::On, LedColor::Red).await.ok();
                DeleteOutcome::Failed(err)
            }
        }
    }

    async fn delete_inner(device: &mut AnySensorDevice, target: u16) -> Result<TemplateSlot> {
        let capacity = device.capacity().await?;
        let slot = TemplateSlot::new(target, capacity)?;
        device.delete_template(slot.index()).await?;
        info!(slot = %slot, "Template deleted");
        flash_status(device, LedColor::Green, STATUS_HOLD_MS).await;
        Ok(slot)
    }

    /// Number of stored templates, queried live from the device.
    ///
    /// `None` means the device could not be asked; the LED is left solid
    /// red in that case.
    pub async fn count(&self) -> Option<u16> {
        let mut device = self.device.lock().await;
        match device.template_count().await {
            Ok(count) => Some(count),
            Err(err) => {
                error!(%err, "Template count failed");
                device.set_led(LedMode::On, LedColor::Red).await.ok();
                None
            }
        }
    }

    /// Wipe the whole template database.
    pub async fn clear(&self) -> bool {
        let mut device = self.device.lock().await;
        match device.clear_database().await {
            Ok(()) => {
                info!("Template database cleared");
                flash_status(&mut *device, LedColor::Green, STATUS_HOLD_MS).await;
                true
            }
            Err(err) => {
                error!(%err, "Database clear failed");
                device.set_led(LedMode::On, LedColor::Red).await.ok();
                false
            }
        }
    }

    /// Turn the LED ring off.
    pub async fn led_off(&self) {
        let mut device = self.device.lock().await;
        led_off(&mut *device).await;
    }
}
