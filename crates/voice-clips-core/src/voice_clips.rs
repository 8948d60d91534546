use crate::{
    ClipError, ClipEvent, ClipResult,
    audio::{CaptureConfig, CaptureDevice, CpalCaptureDevice, MediaProber, WavProber},
    catalog::{Recording, RecordingsCatalog},
    session::{BeginOutcome, Clock, RecordingSession, SessionState, SystemClock, Ticker},
    store::{FileAccessor, FileRef, NameOverrideStore, RecordingStore, SystemFileAccessor},
    views::SharedDetail,
};

use std::{
    panic::Location,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 256;
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Where and how recordings are written.
#[derive(Debug, Clone)]
pub struct VoiceClipsOptions {
    /// Directory holding every recording.
    pub recordings_dir: PathBuf,
    /// Recording file extension, without the dot.
    pub extension: String,
    /// Format of written recordings.
    pub capture: CaptureConfig,
    /// Stopwatch refresh period while recording.
    pub tick_interval: Duration,
}

impl VoiceClipsOptions {
    /// Defaults for everything but the directory.
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            extension: "wav".to_string(),
            capture: CaptureConfig::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// External services the core drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Opens capture targets.
    pub device: Arc<dyn CaptureDevice>,
    /// Reads recording durations.
    pub prober: Arc<dyn MediaProber>,
    /// Lists and removes files.
    pub files: Arc<dyn FileAccessor>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            device: Arc::new(CpalCaptureDevice),
            prober: Arc::new(WavProber),
            files: Arc::new(SystemFileAccessor),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Entry point for presentation layers.
///
/// Owns the one capture session, the catalog and the detail view cache.
/// Session state is always locked before catalog state. Detail views are
/// only locked after both are released, so callers may hold a view while
/// calling back in.
pub struct VoiceClips {
    session: Arc<Mutex<RecordingSession>>,
    catalog: Mutex<RecordingsCatalog>,
    ticker: Mutex<Ticker>,
    events: broadcast::Sender<ClipEvent>,
}

impl VoiceClips {
    /// Wire up the core and load the catalog from disk.
    #[instrument(skip(names, collaborators))]
    pub fn new(
        options: VoiceClipsOptions,
        names: Arc<NameOverrideStore>,
        collaborators: Collaborators,
    ) -> Self {
        let store = Arc::new(RecordingStore::new(
            options.recordings_dir.clone(),
            options.extension.clone(),
            options.capture,
            collaborators.device,
            collaborators.files,
        ));

        let session =
            RecordingSession::new(Arc::clone(&store), Arc::clone(&names), collaborators.clock);
        let mut catalog = RecordingsCatalog::new(store, names, collaborators.prober);
        catalog.refresh(None);

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        info!(recordings_dir = ?options.recordings_dir, "Voice clips core ready");

        Self {
            session: Arc::new(Mutex::new(session)),
            catalog: Mutex::new(catalog),
            ticker: Mutex::new(Ticker::new(options.tick_interval)),
            events,
        }
    }

    /// Receive core notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ClipEvent> {
        self.events.subscribe()
    }

    /// Start a new capture, or resume the paused one.
    #[instrument(skip(self))]
    pub fn begin_capture(&self) -> ClipResult<BeginOutcome> {
        let mut session = self.lock_session();
        let outcome = session.begin()?;

        self.lock_ticker().start(
            session.generation(),
            Arc::downgrade(&self.session),
            self.events.clone(),
        );
        self.emit(ClipEvent::SessionStateChanged(SessionState::Recording));

        if let BeginOutcome::Started { file_ref, .. } = &outcome {
            let sync = {
                let mut catalog = self.lock_catalog();
                catalog.refresh(Some(file_ref));
                catalog.order_sync()
            };
            drop(session);
            sync.apply();
            self.emit(ClipEvent::CatalogChanged);
        }

        Ok(outcome)
    }

    /// Pause the running capture. Returns the elapsed time so far.
    #[instrument(skip(self))]
    pub fn pause_capture(&self) -> ClipResult<Duration> {
        let mut session = self.lock_session();
        let elapsed = session.stop()?;

        self.lock_ticker().cancel();
        self.emit(ClipEvent::SessionStateChanged(SessionState::Paused));
        self.emit(ClipEvent::ElapsedChanged(session.elapsed_display()));

        Ok(elapsed)
    }

    /// Close the capture, running or paused, and add it to the catalog.
    ///
    /// The session is idle afterwards even if closing the file failed.
    #[instrument(skip(self))]
    pub fn finalize_capture(&self) -> ClipResult<FileRef> {
        let mut session = self.lock_session();
        if session.state() == SessionState::Idle {
            // Leaves state untouched and reports the violation.
            return session.finalize();
        }

        let finalized = session.finalize();

        self.lock_ticker().cancel();
        self.emit(ClipEvent::SessionStateChanged(SessionState::Idle));
        self.emit(ClipEvent::ElapsedChanged(session.elapsed_display()));

        let sync = {
            let mut catalog = self.lock_catalog();
            catalog.refresh(None);
            catalog.order_sync()
        };
        drop(session);
        sync.apply();
        self.emit(ClipEvent::CatalogChanged);

        if let Err(e) = &finalized {
            error!(error = %e, "Capture did not close cleanly");
        }

        finalized
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.lock_session().state()
    }

    /// Stopwatch display as of now, `MM:SS:hh`.
    pub fn current_elapsed_display(&self) -> String {
        self.lock_session().elapsed_display()
    }

    /// All recordings, newest first, with durations probed.
    pub fn catalog(&self) -> Vec<Recording> {
        let mut catalog = self.lock_catalog();
        catalog.resolve_durations();
        catalog.recordings().to_vec()
    }

    /// Re-scan the recordings directory.
    #[instrument(skip(self))]
    pub fn refresh(&self) -> Vec<Recording> {
        let session = self.lock_session();
        let mut catalog = self.lock_catalog();
        catalog.refresh(session.active_file());
        catalog.resolve_durations();
        let recordings = catalog.recordings().to_vec();
        let sync = catalog.order_sync();
        drop(catalog);
        drop(session);

        sync.apply();
        self.emit(ClipEvent::CatalogChanged);
        recordings
    }

    /// Give a recording a new display name.
    #[instrument(skip(self))]
    pub fn rename(&self, id: Uuid, name: &str) -> ClipResult<()> {
        self.lock_catalog().rename(id, name)?;
        self.emit(ClipEvent::CatalogChanged);
        Ok(())
    }

    /// Delete a recording's file and every trace of it.
    ///
    /// Deleting the capture in progress is refused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> ClipResult<()> {
        let session = self.lock_session();
        let mut catalog = self.lock_catalog();

        if let (Some(active), Some(recording)) = (session.active_file(), catalog.get(id))
            && active == recording.file_ref()
        {
            warn!(recording_id = %id, "Refusing to delete the capture in progress");
            return Err(ClipError::PreconditionViolation {
                operation: "delete the active recording",
                state: session.state(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let existed = catalog.get(id).is_some();
        let deleted = catalog.delete(id);
        let removed = existed && catalog.get(id).is_none();
        let sync = catalog.order_sync();
        drop(catalog);
        drop(session);

        if removed {
            sync.apply();
            self.emit(ClipEvent::CatalogChanged);
        }

        deleted
    }

    /// Memoized detail view for a recording.
    pub fn derived_view(&self, id: Uuid) -> ClipResult<SharedDetail> {
        self.lock_catalog().derived_view(id)
    }

    /// One recording by id.
    pub fn recording(&self, id: Uuid) -> Option<Recording> {
        let mut catalog = self.lock_catalog();
        catalog.duration(id).ok()?;
        catalog.get(id).cloned()
    }

    fn emit(&self, event: ClipEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn lock_session(&self) -> MutexGuard<'_, RecordingSession> {
        self.session.lock().unwrap_or_else(|e| {
            warn!("Session lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn lock_catalog(&self) -> MutexGuard<'_, RecordingsCatalog> {
        self.catalog.lock().unwrap_or_else(|e| {
            warn!("Catalog lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Ticker> {
        self.ticker.lock().unwrap_or_else(|e| {
            warn!("Ticker lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}
