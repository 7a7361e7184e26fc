//! Tests for PipelineTracker
//!
//! These tests verify:
//! - Counting writes and reads
//! - Rejecting reads with nothing outstanding
//! - Reset on disconnect

use rediswire::network::PipelineTracker;
use rediswire::RedisError;

#[test]
fn test_new_tracker_is_idle() {
    let tracker = PipelineTracker::new();
    assert_eq!(tracker.outstanding(), 0);
    assert!(tracker.is_idle());
}

#[test]
fn test_writes_then_reads() {
    let mut tracker = PipelineTracker::new();

    tracker.on_write();
    tracker.on_write();
    tracker.on_write();
    assert_eq!(tracker.outstanding(), 3);

    tracker.on_read().unwrap();
    assert_eq!(tracker.outstanding(), 2);
    tracker.on_read().unwrap();
    tracker.on_read().unwrap();
    assert!(tracker.is_idle());
}

#[test]
fn test_read_without_write_fails() {
    let mut tracker = PipelineTracker::new();

    assert!(matches!(tracker.on_read(), Err(RedisError::UnexpectedRead)));
    assert!(matches!(tracker.expect_read(), Err(RedisError::UnexpectedRead)));
    // Never goes negative
    assert_eq!(tracker.outstanding(), 0);
}

#[test]
fn test_over_read_fails_after_drain() {
    let mut tracker = PipelineTracker::new();
    tracker.on_write();
    tracker.on_read().unwrap();

    assert!(matches!(tracker.on_read(), Err(RedisError::UnexpectedRead)));
    assert_eq!(tracker.outstanding(), 0);
}

#[test]
fn test_expect_read_does_not_claim() {
    let mut tracker = PipelineTracker::new();
    tracker.on_write();

    tracker.expect_read().unwrap();
    tracker.expect_read().unwrap();
    assert_eq!(tracker.outstanding(), 1);
}

#[test]
fn test_reset() {
    let mut tracker = PipelineTracker::new();
    for _ in 0..5 {
        tracker.on_write();
    }

    tracker.reset();
    assert!(tracker.is_idle());

    tracker.reset();
    assert!(tracker.is_idle());
}
