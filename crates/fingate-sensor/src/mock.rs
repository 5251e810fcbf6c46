//! In-memory sensor simulation.
//!
//! [`MockSensor`] implements [`SensorDevice`] over a shared state block;
//! the paired [`MockSensorHandle`] lets tests queue finger scans, preload
//! templates, inject faults, and inspect what the device was asked to do.
//!
//! Scans are consumed on capture: `queue_scan` puts a finger on the
//! window, and the first successful `capture_image` takes it off again.
//! This makes the wait-for-removal loops in the manager terminate without
//! any extra choreography in tests.

use crate::traits::{CharBuffer, SearchHit, SensorDevice};
use fingate_core::{Error, Result};
use fingate_protocol::{LedColor, LedMode};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Match confidence reported for every mock search hit.
pub const MOCK_ACCURACY: u16 = 100;

const MOCK_CAPACITY: u16 = 200;

#[derive(Debug)]
struct MockState {
    capacity: u16,
    templates: Vec<Option<Vec<u8>>>,
    buffers: [Option<Vec<u8>>; 2],
    scans: VecDeque<Vec<u8>>,
    captured: Option<Vec<u8>>,
    merged: Option<Vec<u8>>,
    password_ok: bool,
    led: Option<(LedMode, LedColor)>,
    store_calls: u32,
    delete_calls: u32,
    fault: Option<String>,
}

impl MockState {
    fn take_fault(&mut self) -> Result<()> {
        match self.fault.take() {
            Some(message) => Err(Error::link(message)),
            None => Ok(()),
        }
    }
}

/// Simulated sensor device.
#[derive(Debug)]
pub struct MockSensor {
    state: Arc<Mutex<MockState>>,
}

/// Test-side handle into a [`MockSensor`]'s state.
#[derive(Debug, Clone)]
pub struct MockSensorHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockSensor {
    /// Create a mock with the default capacity and its control handle.
    #[must_use]
    pub fn new() -> (Self, MockSensorHandle) {
        Self::with_capacity(MOCK_CAPACITY)
    }

    /// Create a mock holding at most `capacity` templates.
    #[must_use]
    pub fn with_capacity(capacity: u16) -> (Self, MockSensorHandle) {
        let state = Arc::new(Mutex::new(MockState {
            capacity,
            templates: vec![None; capacity as usize],
            buffers: [None, None],
            scans: VecDeque::new(),
            captured: None,
            merged: None,
            password_ok: true,
            led: None,
            store_calls: 0,
            delete_calls: 0,
            fault: None,
        }));
        (
            MockSensor {
                state: Arc::clone(&state),
            },
            MockSensorHandle { state },
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SensorDevice for MockSensor {
    async fn verify_password(&mut self) -> Result<bool> {
        let mut state = self.lock();
        state.take_fault()?;
        Ok(state.password_ok)
    }

    async fn capture_image(&mut self) -> Result<bool> {
        let mut state = self.lock();
        state.take_fault()?;
        match state.scans.pop_front() {
            Some(scan) => {
                state.captured = Some(scan);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn convert_image(&mut self, buffer: CharBuffer) -> Result<()> {
        let mut state = self.lock();
        state.take_fault()?;
        let captured = state
            .captured
            .clone()
            .ok_or_else(|| Error::rejected("No captured image to convert"))?;
        state.buffers[buffer.index()] = Some(captured);
        Ok(())
    }

    async fn search(&mut self, buffer: CharBuffer) -> Result<Option<SearchHit>> {
        let mut state = self.lock();
        state.take_fault()?;
        let probe = state.buffers[buffer.index()]
            .clone()
            .ok_or_else(|| Error::rejected("Character buffer is empty"))?;

        let hit = state
            .templates
            .iter()
            .enumerate()
            .find(|(_, stored)| stored.as_deref() == Some(probe.as_slice()))
            .map(|(slot, _)| SearchHit {
                slot: slot as u16,
                accuracy: MOCK_ACCURACY,
            });
        Ok(hit)
    }

    async fn create_template(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.take_fault()?;
        let (first, second) = (state.buffers[0].clone(), state.buffers[1].clone());
        match (first, second) {
            (Some(a), Some(b)) if a == b => {
                state.merged = Some(a);
                Ok(())
            }
            (Some(_), Some(_)) => Err(Error::rejected("Character buffers do not match")),
            _ => Err(Error::rejected("Both character buffers must be filled")),
        }
    }

    async fn store_template(&mut self, slot: u16) -> Result<()> {
        let mut state = self.lock();
        state.take_fault()?;
        if slot >= state.capacity {
            return Err(Error::rejected(format!("Slot {slot} outside capacity")));
        }
        let merged = state
            .merged
            .take()
            .ok_or_else(|| Error::rejected("No merged template to store"))?;
        state.templates[slot as usize] = Some(merged);
        state.store_calls += 1;
        Ok(())
    }

    async fn delete_template(&mut self, slot: u16) -> Result<()> {
        let mut state = self.lock();
        state.take_fault()?;
        if slot >= state.capacity {
            return Err(Error::rejected(format!("Slot {slot} outside capacity")));
        }
        state.templates[slot as usize] = None;
        state.delete_calls += 1;
        Ok(())
    }

    async fn clear_database(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.take_fault()?;
        for template in &mut state.templates {
            *template = None;
        }
        Ok(())
    }

    async fn template_count(&mut self) -> Result<u16> {
        let mut state = self.lock();
        state.take_fault()?;
        Ok(state.templates.iter().filter(|slot| slot.is_some()).count() as u16)
    }

    async fn capacity(&mut self) -> Result<u16> {
        let mut state = self.lock();
        state.take_fault()?;
        Ok(state.capacity)
    }

    async fn set_led(&mut self, mode: LedMode, color: LedColor) -> Result<()> {
        // LED control is advisory upstream; injected faults target the
        // command primitives, not the ring.
        let mut state = self.lock();
        state.led = Some((mode, color));
        Ok(())
    }
}

impl MockSensorHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Put a finger on the window; the next capture consumes it.
    pub fn queue_scan(&self, data: Vec<u8>) {
        self.lock().scans.push_back(data);
    }

    /// Place a template directly into a slot, bypassing enrollment.
    pub fn preload_template(&self, slot: u16, data: Vec<u8>) {
        self.lock().templates[slot as usize] = Some(data);
    }

    /// Read back what a slot holds.
    #[must_use]
    pub fn stored(&self, slot: u16) -> Option<Vec<u8>> {
        self.lock().templates[slot as usize].clone()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn template_count(&self) -> u16 {
        self.lock()
            .templates
            .iter()
            .filter(|slot| slot.is_some())
            .count() as u16
    }

    /// How many store commands the device has executed.
    #[must_use]
    pub fn store_calls(&self) -> u32 {
        self.lock().store_calls
    }

    /// How many delete commands the device has executed.
    #[must_use]
    pub fn delete_calls(&self) -> u32 {
        self.lock().delete_calls
    }

    /// Control whether the password handshake passes.
    pub fn set_password_ok(&self, ok: bool) {
        self.lock().password_ok = ok;
    }

    /// Make the next device primitive fail with a link error.
    pub fn inject_fault(&self, message: impl Into<String>) {
        self.lock().fault = Some(message.into());
    }

    /// Last LED state the device was asked to show.
    #[must_use]
    pub fn led(&self) -> Option<(LedMode, LedColor)> {
        self.lock().led
    }
}
