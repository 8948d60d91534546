//! Capture state machine with its embedded stopwatch.
//!
//! ```text
//! Idle --begin--> Recording --stop--> Paused --finalize--> Idle
//!                  |  ^                 |
//!                  |  +-----begin-------+
//!                  +-------finalize-------------------------> Idle
//! ```
//!
//! Any other transition is a [`ClipError::PreconditionViolation`].

use crate::{
    ClipError, ClipResult,
    audio::CaptureHandle,
    session::{Clock, SessionState, Stopwatch, format_elapsed},
    store::{FileRef, NameOverrideStore, RecordingStore},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Result of a successful `begin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// A new file was created and named.
    Started {
        /// Reference to the new recording file.
        file_ref: FileRef,
        /// Default display name stored for the file.
        default_name: String,
    },
    /// A paused capture continues writing to its existing file.
    Resumed {
        /// Reference to the recording file.
        file_ref: FileRef,
    },
}

impl BeginOutcome {
    /// File the capture is writing to.
    pub fn file_ref(&self) -> &FileRef {
        match self {
            BeginOutcome::Started { file_ref, .. } | BeginOutcome::Resumed { file_ref } => file_ref,
        }
    }
}

struct ActiveCapture {
    file_ref: FileRef,
    handle: Box<dyn CaptureHandle>,
}

/// The single capture that may be in progress.
pub struct RecordingSession {
    store: Arc<RecordingStore>,
    names: Arc<NameOverrideStore>,
    clock: Arc<dyn Clock>,
    state: SessionState,
    capture: Option<ActiveCapture>,
    stopwatch: Stopwatch,
    /// Bumped on every transition; ticks carrying an older value are ignored.
    generation: u64,
}

impl RecordingSession {
    /// Create an idle session.
    pub fn new(
        store: Arc<RecordingStore>,
        names: Arc<NameOverrideStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            names,
            clock,
            state: SessionState::Idle,
            capture: None,
            stopwatch: Stopwatch::default(),
            generation: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// File of the capture in progress, absent while idle.
    pub fn active_file(&self) -> Option<&FileRef> {
        self.capture.as_ref().map(|c| &c.file_ref)
    }

    /// Generation of the current running interval, for tick filtering.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new capture when idle, or resume a paused one.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn begin(&mut self) -> ClipResult<BeginOutcome> {
        match self.state {
            SessionState::Idle => self.start_new(),
            SessionState::Paused => self.resume(),
            SessionState::Recording => Err(self.violation("begin")),
        }
    }

    /// Pause the running capture.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn stop(&mut self) -> ClipResult<Duration> {
        if self.state != SessionState::Recording || !self.stopwatch.is_running() {
            return Err(self.violation("stop"));
        }

        let Some(capture) = self.capture.as_mut() else {
            return Err(self.violation("stop"));
        };

        capture.handle.pause()?;

        let now = self.clock.now();
        let interval = self
            .stopwatch
            .stop(now)
            .ok_or_else(|| self.violation("stop"))?;

        self.state = SessionState::Paused;
        self.generation += 1;

        info!(
            interval_ms = interval.as_millis(),
            elapsed_ms = self.stopwatch.elapsed(now).as_millis(),
            "Capture paused"
        );

        Ok(self.stopwatch.elapsed(now))
    }

    /// Close the capture for good and return to idle.
    ///
    /// A running capture has its open interval closed first. The session is
    /// idle afterwards even when the device fails to close the file; that
    /// failure is still reported.
    #[track_caller]
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn finalize(&mut self) -> ClipResult<FileRef> {
        if self.state == SessionState::Idle {
            return Err(self.violation("finalize"));
        }

        let Some(mut capture) = self.capture.take() else {
            return Err(self.violation("finalize"));
        };

        let now = self.clock.now();
        self.stopwatch.stop(now);
        let elapsed = self.stopwatch.elapsed(now);
        let stopped = capture.handle.stop();

        self.stopwatch.reset();
        self.state = SessionState::Idle;
        self.generation += 1;

        stopped?;

        info!(
            file_ref = %capture.file_ref,
            elapsed_ms = elapsed.as_millis(),
            "Capture finalized"
        );

        Ok(capture.file_ref)
    }

    /// Elapsed capture time as of now.
    pub fn elapsed(&self) -> Duration {
        match self.state {
            SessionState::Idle => Duration::ZERO,
            _ => self.stopwatch.elapsed(self.clock.now()),
        }
    }

    /// Elapsed capture time formatted as `MM:SS:hh`.
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed())
    }

    /// Display for a stopwatch tick, or `None` when the tick is stale.
    ///
    /// Ticks never touch accumulated time.
    pub fn tick(&self, generation: u64) -> Option<String> {
        if self.state != SessionState::Recording || generation != self.generation {
            return None;
        }
        Some(self.elapsed_display())
    }

    #[track_caller]
    fn start_new(&mut self) -> ClipResult<BeginOutcome> {
        let name = self.store.generate_name(self.clock.wall_time())?;
        let prepared = self.store.prepare_recorder(&name)?;
        let file_ref = prepared.file_ref;
        let mut handle = prepared.handle;

        let default_name = match self.name_new_capture(&file_ref) {
            Ok(n) => n,
            Err(e) => {
                self.discard(&file_ref, handle);
                return Err(e);
            }
        };

        if let Err(e) = handle.record() {
            self.discard(&file_ref, handle);
            return Err(e);
        }

        self.stopwatch.reset();
        self.stopwatch.start(self.clock.now());
        self.capture = Some(ActiveCapture {
            file_ref: file_ref.clone(),
            handle,
        });
        self.state = SessionState::Recording;
        self.generation += 1;

        info!(file_ref = %file_ref, default_name = %default_name, "Capture started");

        Ok(BeginOutcome::Started {
            file_ref,
            default_name,
        })
    }

    #[track_caller]
    fn resume(&mut self) -> ClipResult<BeginOutcome> {
        let Some(capture) = self.capture.as_mut() else {
            return Err(self.violation("resume"));
        };

        capture.handle.record()?;
        let file_ref = capture.file_ref.clone();

        if !self.stopwatch.start(self.clock.now()) {
            return Err(self.violation("resume"));
        }
        self.state = SessionState::Recording;
        self.generation += 1;

        debug!(file_ref = %file_ref, "Capture resumed");

        Ok(BeginOutcome::Resumed { file_ref })
    }

    fn name_new_capture(&self, file_ref: &FileRef) -> ClipResult<String> {
        let number = self.names.next_counter()?;
        let default_name = format!("Recording {}", number);
        self.names.set_name(file_ref, &default_name)?;
        Ok(default_name)
    }

    /// Close and remove a target that never became an active capture.
    fn discard(&self, file_ref: &FileRef, mut handle: Box<dyn CaptureHandle>) {
        if let Err(e) = handle.stop() {
            warn!(file_ref = %file_ref, error = %e, "Failed to close abandoned capture");
        }
        if let Err(e) = self.store.delete(file_ref) {
            warn!(file_ref = %file_ref, error = %e, "Failed to remove abandoned capture");
        }
    }

    #[track_caller]
    fn violation(&self, operation: &'static str) -> ClipError {
        warn!(operation, state = ?self.state, "Invalid session transition");
        ClipError::PreconditionViolation {
            operation,
            state: self.state,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
