use std::time::Instant;

use chrono::{DateTime, Local};

/// Time source for the stopwatch and for file naming.
pub trait Clock: Send + Sync {
    /// Monotonic instant used for elapsed-time arithmetic.
    fn now(&self) -> Instant;

    /// Wall-clock time used to stamp new recordings.
    fn wall_time(&self) -> DateTime<Local>;
}

/// [`Clock`] reading the system clocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }
}
