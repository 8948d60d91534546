use std::time::{Duration, Instant};

/// Format elapsed time as `MM:SS:hh` (minutes, seconds, hundredths).
///
/// Minutes are not wrapped at the hour.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let hundredths = elapsed.subsec_nanos() / 10_000_000;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}

/// Elapsed time accumulated over any number of running intervals.
///
/// Accumulated time only changes when an interval closes; reading the
/// elapsed time while running never mutates it.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Stopwatch {
    accumulated: Duration,
    interval_start: Option<Instant>,
}

impl Stopwatch {
    pub(crate) fn is_running(&self) -> bool {
        self.interval_start.is_some()
    }

    /// Open a running interval. Returns false if one is already open.
    pub(crate) fn start(&mut self, now: Instant) -> bool {
        if self.interval_start.is_some() {
            return false;
        }
        self.interval_start = Some(now);
        true
    }

    /// Close the running interval, folding it into the accumulated time.
    ///
    /// Returns the closed interval's length, or `None` if nothing was running.
    pub(crate) fn stop(&mut self, now: Instant) -> Option<Duration> {
        let start = self.interval_start.take()?;
        let interval = now.saturating_duration_since(start);
        self.accumulated += interval;
        Some(interval)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        match self.interval_start {
            Some(start) => self.accumulated + now.saturating_duration_since(start),
            None => self.accumulated,
        }
    }
}
