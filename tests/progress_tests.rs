// Tests for the upload progress channel.

use echonote::{ProgressTracker, UploadProgress};

#[test]
fn test_progress_starts_cleared() {
    let (tracker, rx) = ProgressTracker::channel();

    assert_eq!(*rx.borrow(), UploadProgress::default());
    assert_eq!(tracker.current().percent, 0);
    assert!(!tracker.current().in_flight);
}

#[test]
fn test_begin_resets_and_marks_in_flight() {
    let (tracker, rx) = ProgressTracker::channel();

    tracker.update(50, 100);
    tracker.finish();
    tracker.begin();

    let progress = *rx.borrow();
    assert_eq!(progress.percent, 0);
    assert!(progress.in_flight);
}

#[test]
fn test_percent_is_monotonically_non_decreasing() {
    let (tracker, rx) = ProgressTracker::channel();
    tracker.begin();

    tracker.update(60, 100);
    assert_eq!(rx.borrow().percent, 60);

    // A late or reordered update may not move the bar backwards
    tracker.update(30, 100);
    assert_eq!(rx.borrow().percent, 60);

    tracker.update(100, 100);
    assert_eq!(rx.borrow().percent, 100);
}

#[test]
fn test_percent_is_capped_at_100() {
    let (tracker, rx) = ProgressTracker::channel();
    tracker.begin();

    tracker.update(150, 100);

    assert_eq!(rx.borrow().percent, 100);
}

#[test]
fn test_zero_total_counts_as_complete() {
    let (tracker, rx) = ProgressTracker::channel();
    tracker.begin();

    tracker.update(0, 0);

    assert_eq!(rx.borrow().percent, 100);
}

#[test]
fn test_finish_keeps_last_percent() {
    let (tracker, rx) = ProgressTracker::channel();
    tracker.begin();
    tracker.update(80, 100);

    tracker.finish();

    let progress = *rx.borrow();
    assert_eq!(progress.percent, 80);
    assert!(!progress.in_flight);
}

#[test]
fn test_reset_clears_everything() {
    let (tracker, rx) = ProgressTracker::channel();
    tracker.begin();
    tracker.update(80, 100);

    tracker.reset();

    assert_eq!(*rx.borrow(), UploadProgress::default());
}
