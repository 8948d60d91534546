use crate::config::default_tick_interval_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stopwatch display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchConfig {
    /// Refresh period of the elapsed display while recording.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl StopwatchConfig {
    /// Tick period, never shorter than one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
