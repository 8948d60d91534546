use crate::{ClipEvent, session::RecordingSession};

use std::{
    sync::{Mutex, Weak},
    time::Duration,
};

use tokio::{
    runtime::Handle,
    sync::broadcast,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, trace, warn};

/// Periodic stopwatch refresh while a capture is running.
///
/// Each tick only republishes the elapsed display; accumulated time is owned
/// by the session and changes at pause/resume boundaries.
pub(crate) struct Ticker {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    /// Start ticking for `generation`, replacing any previous run.
    ///
    /// Without a tokio runtime there is nothing to drive the ticks; the
    /// display is then only computed on request.
    pub(crate) fn start(
        &mut self,
        generation: u64,
        session: Weak<Mutex<RecordingSession>>,
        events: broadcast::Sender<ClipEvent>,
    ) {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime, stopwatch ticks disabled");
            return;
        };

        let period = self.period;
        self.task = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let Some(session) = session.upgrade() else {
                    break;
                };
                let display = session
                    .lock()
                    .unwrap_or_else(|e| {
                        warn!("Session lock poisoned, recovering: {}", e);
                        e.into_inner()
                    })
                    .tick(generation);

                match display {
                    Some(display) => {
                        let _ = events.send(ClipEvent::ElapsedChanged(display));
                    }
                    None => {
                        trace!(generation, "Stale stopwatch tick, stopping");
                        break;
                    }
                }
            }
        }));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
