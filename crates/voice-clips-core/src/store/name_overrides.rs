//! Persisted display names and the default-name counter.
//!
//! Stored as a small TOML document next to the application config:
//!
//! ```toml
//! next_recording_number = 3
//!
//! [names]
//! "/data/recordings/recording_20240101120000.wav" = "Morning walk"
//! ```

use crate::{ClipError, ClipResult, store::FileRef};

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct NameOverrides {
    #[serde(default)]
    next_recording_number: u64,
    #[serde(default)]
    names: BTreeMap<String, String>,
}

/// Maps file references to user-chosen display names.
///
/// Every mutation is written through to disk before it becomes visible, so a
/// failed write leaves both the file and the in-memory view unchanged.
#[derive(Debug)]
pub struct NameOverrideStore {
    path: Option<PathBuf>,
    state: Mutex<NameOverrides>,
}

impl NameOverrideStore {
    /// Load the store from `path`. A missing file is an empty store.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> ClipResult<Self> {
        let path = path.to_path_buf();

        let state = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| ClipError::StoreError {
                reason: format!("Failed to read name store: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            toml::from_str(&contents).map_err(|e| ClipError::StoreError {
                reason: format!("Failed to parse name store: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
        } else {
            debug!("No name store yet, starting empty");
            NameOverrides::default()
        };

        info!(
            names = state.names.len(),
            next_recording_number = state.next_recording_number,
            "Name store loaded"
        );

        Ok(Self {
            path: Some(path),
            state: Mutex::new(state),
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(NameOverrides::default()),
        }
    }

    /// Display name stored for `file_ref`, if any.
    pub fn get_name(&self, file_ref: &FileRef) -> Option<String> {
        self.lock().names.get(&file_ref.key()).cloned()
    }

    /// Display name stored for `file_ref`, or `default` when absent.
    pub fn name_or(&self, file_ref: &FileRef, default: &str) -> String {
        self.get_name(file_ref).unwrap_or_else(|| default.to_string())
    }

    /// Store a display name for `file_ref`.
    #[track_caller]
    #[instrument(skip(self, file_ref), fields(file_ref = %file_ref))]
    pub fn set_name(&self, file_ref: &FileRef, name: &str) -> ClipResult<()> {
        self.update(|state| {
            state.names.insert(file_ref.key(), name.to_string());
        })
    }

    /// Drop the stored name for `file_ref`. Absent entries are not an error.
    #[track_caller]
    #[instrument(skip(self, file_ref), fields(file_ref = %file_ref))]
    pub fn remove(&self, file_ref: &FileRef) -> ClipResult<()> {
        let key = file_ref.key();
        if !self.lock().names.contains_key(&key) {
            return Ok(());
        }
        self.update(|state| {
            state.names.remove(&key);
        })
    }

    /// Increment the recording counter and return the new value.
    ///
    /// The first call on an empty store returns 1.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn next_counter(&self) -> ClipResult<u64> {
        let mut next = 0;
        self.update(|state| {
            state.next_recording_number = state.next_recording_number.saturating_add(1);
            next = state.next_recording_number;
        })?;
        debug!(next, "Recording counter advanced");
        Ok(next)
    }

    /// Last value handed out by [`next_counter`](Self::next_counter).
    pub fn current_counter(&self) -> u64 {
        self.lock().next_recording_number
    }

    #[track_caller]
    fn update(&self, mutate: impl FnOnce(&mut NameOverrides)) -> ClipResult<()> {
        let mut state = self.lock();
        let mut next = state.clone();
        mutate(&mut next);

        if let Some(path) = &self.path {
            write_atomically(path, &next)?;
        }

        *state = next;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, NameOverrides> {
        self.state.lock().unwrap_or_else(|e| {
            warn!("Name store lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

/// Write to a temporary file then rename over the target.
#[track_caller]
fn write_atomically(path: &Path, state: &NameOverrides) -> ClipResult<()> {
    let store_error = |what: &str, e: &dyn std::fmt::Display| ClipError::StoreError {
        reason: format!("{}: {}", what, e),
        location: ErrorLocation::from(Location::caller()),
    };

    let contents =
        toml::to_string_pretty(state).map_err(|e| store_error("Failed to serialize", &e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| store_error("Failed to create directory", &e))?;
    }

    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file =
        fs::File::create(&temp_path).map_err(|e| store_error("Failed to create temp file", &e))?;
    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| store_error("Failed to write temp file", &e))?;
    temp_file
        .sync_all()
        .map_err(|e| store_error("Failed to sync temp file", &e))?;
    fs::rename(&temp_path, path).map_err(|e| store_error("Failed to replace name store", &e))?;

    debug!(path = ?path, "Name store saved");

    Ok(())
}
