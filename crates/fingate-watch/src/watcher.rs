//! The continuous verification loop.
//!
//! [`Watcher`] runs a background task that polls the sensor for a finger
//! and verifies whatever shows up, emitting [`WatchEvent`]s on a bounded
//! channel. It shares the device mutex with the foreground manager and
//! takes it once per iteration, so a foreground enroll or delete slots in
//! between iterations without the loop being stopped.
//!
//! The loop is fail-stop: a device or link fault emits one error event,
//! leaves the LED solid red, and terminates the task. Restarting after a
//! fault is the owner's call, via [`Watcher::start`].

use crate::events::WatchEvent;
use crate::metadata::{is_runnable, ActionExecutor, MetadataLookup};
use fingate_core::constants::{IDLE_POLL_INTERVAL_MS, STATUS_HOLD_MS};
use fingate_core::{Result, TemplateSlot};
use fingate_protocol::{LedColor, LedMode};
use fingate_sensor::ops::{blink_status, flash_status, wait_finger_removed};
use fingate_sensor::{AnySensorDevice, CharBuffer, SensorDevice};
use std::fmt;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Bound on undelivered events before the loop starts dropping them.
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Default)]
struct WatchState {
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

/// Owner of the continuous verification task.
pub struct Watcher {
    device: Arc<Mutex<AnySensorDevice>>,
    metadata: Arc<dyn MetadataLookup>,
    executor: Arc<dyn ActionExecutor>,
    events_tx: mpsc::Sender<WatchEvent>,
    state: StdMutex<WatchState>,
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("running", &self.is_running())
            .finish()
    }
}

impl Watcher {
    /// Create a watcher over a shared device handle.
    ///
    /// The returned receiver carries the loop's events; it is bounded, and
    /// events are dropped (with a warning) rather than stalling the loop
    /// when the consumer falls behind.
    #[must_use]
    pub fn new(
        device: Arc<Mutex<AnySensorDevice>>,
        metadata: Arc<dyn MetadataLookup>,
        executor: Arc<dyn ActionExecutor>,
    ) -> (Self, mpsc::Receiver<WatchEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (
            Watcher {
                device,
                metadata,
                executor,
                events_tx,
                state: StdMutex::new(WatchState::default()),
            },
            events_rx,
        )
    }

    /// Start the loop. Returns `false` if it is already running.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.task.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!("Watch loop already running");
            return false;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_loop(
            Arc::clone(&self.device),
            Arc::clone(&self.metadata),
            Arc::clone(&self.executor),
            self.events_tx.clone(),
            cancel.clone(),
        ));
        state.cancel = Some(cancel);
        state.task = Some(task);
        info!("Watch loop started");
        true
    }

    /// Request the loop to stop after its current iteration. Returns
    /// `false` if no stop was pending to issue, including after the loop
    /// terminated itself on a device fault.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let running = state.task.as_ref().is_some_and(|task| !task.is_finished());
        match state.cancel.take() {
            Some(cancel) if running => {
                cancel.cancel();
                info!("Watch loop stop requested");
                true
            }
            // A token left behind by a self-terminated loop is stale.
            _ => false,
        }
    }

    /// Whether the loop task is currently alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

async fn run_loop(
    device: Arc<Mutex<AnySensorDevice>>,
    metadata: Arc<dyn MetadataLookup>,
    executor: Arc<dyn ActionExecutor>,
    events_tx: mpsc::Sender<WatchEvent>,
    cancel: CancellationToken,
) {
    loop {
        // Cancellation is only honored between iterations; an in-flight
        // verification always reaches its terminal LED state.
        if cancel.is_cancelled() {
            break;
        }

        let mut dev = device.lock().await;
        let present = match dev.capture_image().await {
            Ok(present) => present,
            Err(err) => {
                error!(%err, "Watch loop device fault");
                dev.set_led(LedMode::On, LedColor::Red).await.ok();
                emit(&events_tx, WatchEvent::fault(err.to_string()));
                break;
            }
        };

        if !present {
            // Release the device while idling so foreground operations
            // can take it.
            drop(dev);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_millis(IDLE_POLL_INTERVAL_MS)) => {}
            }
            continue;
        }

        // The event goes out as soon as the verification is classified;
        // the removal wait must not delay consumers.
        match verify_present_finger(&mut dev, metadata.as_ref(), executor.as_ref()).await {
            Ok(event) => emit(&events_tx, event),
            Err(err) => {
                error!(%err, "Watch loop verification fault");
                dev.set_led(LedMode::On, LedColor::Red).await.ok();
                emit(&events_tx, WatchEvent::fault(err.to_string()));
                break;
            }
        }

        if let Err(err) = wait_finger_removed(&mut *dev).await {
            error!(%err, "Watch loop device fault");
            dev.set_led(LedMode::On, LedColor::Red).await.ok();
            emit(&events_tx, WatchEvent::fault(err.to_string()));
            break;
        }
    }
    info!("Watch loop stopped");
}

/// Verify the finger already captured by the presence check.
async fn verify_present_finger(
    device: &mut AnySensorDevice,
    metadata: &dyn MetadataLookup,
    executor: &dyn ActionExecutor,
) -> Result<WatchEvent> {
    device.convert_image(CharBuffer::One).await?;

    let event = match device.search(CharBuffer::One).await? {
        Some(hit) => {
            let capacity = device.capacity().await?;
            let slot = TemplateSlot::new(hit.slot, capacity)?;
            let meta = metadata.lookup(slot);
            info!(slot = %slot, accuracy = hit.accuracy, "Watch loop matched fingerprint");

            if let Some(action) = meta.as_ref().and_then(|meta| meta.action.as_deref()) {
                if is_runnable(action) {
                    debug!(action, "Dispatching matched action");
                    tokio::spawn(executor.run(action));
                }
            }

            flash_status(device, LedColor::Green, STATUS_HOLD_MS).await;
            WatchEvent::matched(slot, hit.accuracy, meta)
        }
        None => {
            info!("Watch loop saw an unknown fingerprint");
            blink_status(device, LedColor::Red, STATUS_HOLD_MS).await;
            WatchEvent::no_match()
        }
    };

    Ok(event)
}

fn emit(events_tx: &mpsc::Sender<WatchEvent>, event: WatchEvent) {
    if let Err(err) = events_tx.try_send(event) {
        warn!(%err, "Watch event dropped");
    }
}
