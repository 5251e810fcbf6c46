//! End-to-end manager flows against the mock device.
//!
//! The clock starts paused so the LED holds and finger-poll intervals
//! cost nothing; fingers are fed from a side task with gaps wider than
//! the removal settle pause, the way a person would present them.

use fingate_core::{DeleteOutcome, EnrollOutcome, Error, VerifyOutcome};
use fingate_sensor::{AnySensorDevice, MockSensor, MockSensorHandle, SensorConfig, SensorManager};
use std::time::Duration;

fn manager_with(mock: MockSensor) -> SensorManager {
    SensorManager::new(SensorConfig::default(), AnySensorDevice::Mock(mock))
}

/// Present the same finger `times` times, with a pause between placements.
fn feed_scans(handle: &MockSensorHandle, finger: &[u8], times: usize) {
    let handle = handle.clone();
    let finger = finger.to_vec();
    tokio::spawn(async move {
        for _ in 0..times {
            handle.queue_scan(finger.clone());
            tokio::time::sleep(Duration::from_millis(1_250)).await;
        }
    });
}

#[tokio::test(start_paused = true)]
async fn enroll_stores_at_next_free_slot() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    feed_scans(&handle, b"finger-a", 2);
    let outcome = manager.enroll().await;

    match outcome {
        EnrollOutcome::Enrolled(slot) => assert_eq!(slot.index(), 0),
        other => panic!("expected Enrolled, got {other:?}"),
    }
    assert_eq!(handle.template_count(), 1);
    assert_eq!(handle.store_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn enroll_of_known_finger_reports_existing_slot() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    feed_scans(&handle, b"finger-a", 2);
    assert!(manager.enroll().await.is_enrolled());

    feed_scans(&handle, b"finger-a", 2);
    let outcome = manager.enroll().await;

    match outcome {
        EnrollOutcome::AlreadyExists(slot) => assert_eq!(slot.index(), 0),
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
    // The duplicate must not have been stored a second time.
    assert_eq!(handle.template_count(), 1);
    assert_eq!(handle.store_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn enroll_at_capacity_fails_without_storing() {
    let (mock, handle) = MockSensor::with_capacity(1);
    handle.preload_template(0, b"resident".to_vec());
    let manager = manager_with(mock);

    let outcome = manager.enroll().await;
    match outcome {
        EnrollOutcome::Failed(Error::CapacityExceeded { count, capacity }) => {
            assert_eq!(count, 1);
            assert_eq!(capacity, 1);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    assert_eq!(handle.store_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn verify_matches_enrolled_finger() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(3, b"finger-b".to_vec());
    let manager = manager_with(mock);

    feed_scans(&handle, b"finger-b", 1);
    let outcome = manager.verify().await;

    match outcome {
        VerifyOutcome::Match { slot, accuracy } => {
            assert_eq!(slot.index(), 3);
            assert!(accuracy > 0);
        }
        other => panic!("expected Match, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn verify_of_unknown_finger_is_no_match() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    feed_scans(&handle, b"stranger", 1);
    let outcome = manager.verify().await;
    assert!(matches!(outcome, VerifyOutcome::NoMatch));
}

#[tokio::test(start_paused = true)]
async fn verify_folds_device_fault_into_outcome() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    handle.inject_fault("line noise");
    let outcome = manager.verify().await;
    assert!(matches!(outcome, VerifyOutcome::Failed(Error::LinkFailure(_))));
}

#[tokio::test(start_paused = true)]
async fn delete_by_slot_removes_template() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(5, b"finger-c".to_vec());
    let manager = manager_with(mock);

    let outcome = manager.delete(Some(5)).await;
    match outcome {
        DeleteOutcome::Deleted(slot) => assert_eq!(slot.index(), 5),
        other => panic!("expected Deleted, got {other:?}"),
    }
    assert!(handle.stored(5).is_none());
}

#[tokio::test(start_paused = true)]
async fn delete_by_slot_rejects_out_of_range() {
    let (mock, handle) = MockSensor::with_capacity(10);
    let manager = manager_with(mock);

    let outcome = manager.delete(Some(10)).await;
    assert!(matches!(
        outcome,
        DeleteOutcome::Failed(Error::DeviceRejected(_))
    ));
    assert_eq!(handle.delete_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn delete_by_finger_verifies_first() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(2, b"finger-d".to_vec());
    let manager = manager_with(mock);

    feed_scans(&handle, b"finger-d", 1);
    let outcome = manager.delete(None).await;

    match outcome {
        DeleteOutcome::Deleted(slot) => assert_eq!(slot.index(), 2),
        other => panic!("expected Deleted, got {other:?}"),
    }
    assert!(handle.stored(2).is_none());
}

#[tokio::test(start_paused = true)]
async fn delete_by_finger_miss_touches_nothing() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(2, b"finger-d".to_vec());
    let manager = manager_with(mock);

    feed_scans(&handle, b"stranger", 1);
    let outcome = manager.delete(None).await;

    assert!(matches!(outcome, DeleteOutcome::NotFound));
    assert_eq!(handle.delete_calls(), 0);
    assert!(handle.stored(2).is_some());
}

#[tokio::test(start_paused = true)]
async fn delete_by_finger_fault_skips_device_delete() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    handle.inject_fault("line noise");
    let outcome = manager.delete(None).await;

    assert!(matches!(outcome, DeleteOutcome::Failed(_)));
    assert_eq!(handle.delete_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn count_reads_live_from_device() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(0, b"a".to_vec());
    handle.preload_template(9, b"b".to_vec());
    let manager = manager_with(mock);

    assert_eq!(manager.count().await, Some(2));

    handle.inject_fault("line noise");
    assert_eq!(manager.count().await, None);
}

#[tokio::test(start_paused = true)]
async fn clear_is_idempotent() {
    let (mock, handle) = MockSensor::new();
    handle.preload_template(0, b"a".to_vec());
    handle.preload_template(1, b"b".to_vec());
    let manager = manager_with(mock);

    assert!(manager.clear().await);
    assert_eq!(handle.template_count(), 0);

    // Clearing an empty database is still a success.
    assert!(manager.clear().await);
    assert_eq!(manager.count().await, Some(0));
}

#[tokio::test(start_paused = true)]
async fn connect_reports_password_rejection() {
    let (mock, handle) = MockSensor::new();
    let manager = manager_with(mock);

    assert!(manager.connect().await);

    handle.set_password_ok(false);
    assert!(!manager.connect().await);
}
