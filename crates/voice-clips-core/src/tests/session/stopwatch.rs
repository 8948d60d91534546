use crate::{format_elapsed, session::Stopwatch};

use std::time::{Duration, Instant};

/// WHAT: Display is MM:SS:hh with hundredths from the fractional second
/// WHY: The stopwatch face shows centiseconds, not seconds and frames
#[test]
fn given_durations_when_formatting_then_minutes_seconds_hundredths() {
    assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
    assert_eq!(format_elapsed(Duration::from_millis(2500)), "00:02:50");
    assert_eq!(format_elapsed(Duration::from_millis(61_070)), "01:01:07");
    assert_eq!(format_elapsed(Duration::from_millis(999)), "00:00:99");
}

/// WHAT: Minutes keep counting past an hour
/// WHY: The display has no hours field
#[test]
fn given_more_than_an_hour_when_formatting_then_minutes_not_wrapped() {
    assert_eq!(format_elapsed(Duration::from_secs(3725)), "62:05:00");
}

/// WHAT: Elapsed time sums every running interval
/// WHY: Paused time must not count towards the capture length
#[test]
fn given_two_intervals_when_reading_elapsed_then_sum_excludes_gap() {
    // Given: A stopwatch run for 2s, paused 10s, run again 1s
    let t0 = Instant::now();
    let mut stopwatch = Stopwatch::default();
    assert!(stopwatch.start(t0));
    assert_eq!(stopwatch.stop(t0 + Duration::from_secs(2)), Some(Duration::from_secs(2)));
    assert!(stopwatch.start(t0 + Duration::from_secs(12)));

    // When: Reading while the second interval is open
    let elapsed = stopwatch.elapsed(t0 + Duration::from_secs(13));

    // Then: Only running time counts
    assert_eq!(elapsed, Duration::from_secs(3));
    assert!(stopwatch.is_running());
}

/// WHAT: Reading elapsed time never changes accumulated time
/// WHY: Ticks read the stopwatch many times per second
#[test]
fn given_running_stopwatch_when_reading_repeatedly_then_stop_total_unaffected() {
    let t0 = Instant::now();
    let mut stopwatch = Stopwatch::default();
    stopwatch.start(t0);

    for ms in (0..1000).step_by(10) {
        stopwatch.elapsed(t0 + Duration::from_millis(ms));
    }
    stopwatch.stop(t0 + Duration::from_secs(1));

    assert_eq!(stopwatch.elapsed(t0 + Duration::from_secs(50)), Duration::from_secs(1));
}

/// WHAT: Double start and double stop are rejected
/// WHY: An interval must be opened and closed exactly once
#[test]
fn given_unbalanced_calls_when_starting_or_stopping_then_rejected() {
    let t0 = Instant::now();
    let mut stopwatch = Stopwatch::default();

    assert_eq!(stopwatch.stop(t0), None);
    assert!(stopwatch.start(t0));
    assert!(!stopwatch.start(t0));

    stopwatch.reset();
    assert!(!stopwatch.is_running());
    assert_eq!(stopwatch.elapsed(t0), Duration::ZERO);
}
