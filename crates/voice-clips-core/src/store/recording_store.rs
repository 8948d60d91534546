use crate::{
    ClipError, ClipResult,
    audio::{CaptureConfig, CaptureDevice, CaptureHandle},
    store::{FileAccessor, FileRef, UniqueNamer},
};

use std::{
    ffi::OsStr,
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Upper bound on name attempts before giving up on finding a free filename.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// A recording file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecording {
    /// Reference to the file.
    pub file_ref: FileRef,
    /// File creation time.
    pub created: DateTime<Local>,
}

/// Capture handle bound to a freshly named file.
pub struct PreparedRecorder {
    /// Reference to the file being captured.
    pub file_ref: FileRef,
    /// Open capture writing to `file_ref`.
    pub handle: Box<dyn CaptureHandle>,
}

/// Owns the recordings directory.
pub struct RecordingStore {
    base_dir: PathBuf,
    extension: String,
    config: CaptureConfig,
    namer: Mutex<UniqueNamer>,
    device: Arc<dyn CaptureDevice>,
    files: Arc<dyn FileAccessor>,
}

impl RecordingStore {
    /// Create a store rooted at `base_dir` writing `extension` files.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        config: CaptureConfig,
        device: Arc<dyn CaptureDevice>,
        files: Arc<dyn FileAccessor>,
    ) -> Self {
        let extension = extension.into();
        Self {
            base_dir: base_dir.into(),
            namer: Mutex::new(UniqueNamer::new(extension.clone())),
            extension,
            config,
            device,
            files,
        }
    }

    /// Directory holding all recordings.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Generate a filename for `now` that no existing file uses.
    #[track_caller]
    pub fn generate_name(&self, now: DateTime<Local>) -> ClipResult<String> {
        let mut namer = self.namer.lock().unwrap_or_else(|e| {
            warn!("Namer lock poisoned, recovering: {}", e);
            e.into_inner()
        });

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = namer.generate_name(now);
            if !self.files.exists(&self.base_dir.join(&name)) {
                return Ok(name);
            }
            debug!(name = %name, "Name already taken on disk");
        }

        Err(ClipError::RecorderInitFailed {
            path: self.base_dir.clone(),
            reason: "No free recording name for this second".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Open a capture target named `name` inside the base directory.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn prepare_recorder(&self, name: &str) -> ClipResult<PreparedRecorder> {
        self.files
            .create_dir_all(&self.base_dir)
            .map_err(|e| ClipError::RecorderInitFailed {
                path: self.base_dir.clone(),
                reason: format!("Failed to create recordings directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let path = self.base_dir.join(name);
        let handle = self.device.open(&path, &self.config)?;

        info!(path = ?path, "Recorder prepared");

        Ok(PreparedRecorder {
            file_ref: FileRef::new(path),
            handle,
        })
    }

    /// List recording files, oldest first.
    ///
    /// Best effort: an unreadable directory yields an empty list and entries
    /// that cannot be inspected are skipped. Both are logged.
    #[instrument(skip(self))]
    pub fn list_recordings(&self) -> Vec<StoredRecording> {
        let entries = match self.files.list(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(base_dir = ?self.base_dir, "Recordings directory does not exist yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(base_dir = ?self.base_dir, error = %e, "Could not read recordings directory");
                return Vec::new();
            }
        };

        let extension = OsStr::new(&self.extension);
        let mut recordings: Vec<StoredRecording> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(listed) => Some(listed),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|listed| listed.path.extension() == Some(extension))
            .map(|listed| StoredRecording {
                file_ref: FileRef::new(listed.path),
                created: DateTime::<Local>::from(listed.created),
            })
            .collect();

        recordings.sort_by(|a, b| {
            a.created
                .cmp(&b.created)
                .then_with(|| a.file_ref.cmp(&b.file_ref))
        });

        debug!(count = recordings.len(), "Listed recordings");

        recordings
    }

    /// Remove a recording file.
    #[track_caller]
    #[instrument(skip(self, file_ref), fields(file_ref = %file_ref))]
    pub fn delete(&self, file_ref: &FileRef) -> ClipResult<()> {
        let path = file_ref.path();

        if !self.files.exists(path) {
            return Err(ClipError::FileNotFound {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match self.files.remove(path) {
            Ok(()) => {
                info!("Recording file deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ClipError::FileNotFound {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(source) => Err(ClipError::DeleteFailed {
                path: path.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
