use crate::{
    ClipError, ClipResult,
    audio::MediaProber,
    catalog::{Recording, RecordingStatus},
    store::{FileRef, NameOverrideStore, RecordingStore},
    views::{DerivedViewCache, OrderSync, RecordingDetail, SharedDetail},
};

use std::{collections::HashMap, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Name shown for files that have no stored display name.
pub const UNNAMED: &str = "Unnamed";

/// Deduplicated view of all recordings, newest first.
///
/// Holds exactly one [`Recording`] per file on disk. Entries keep their id
/// across refreshes for as long as their file exists.
///
/// Cached detail views are never locked from here. After an order change,
/// take [`order_sync`](Self::order_sync) and apply it once the catalog is no
/// longer borrowed.
pub struct RecordingsCatalog {
    store: Arc<RecordingStore>,
    names: Arc<NameOverrideStore>,
    prober: Arc<dyn MediaProber>,
    entries: Vec<Recording>,
    views: DerivedViewCache,
    /// Bumped whenever the entry order changes.
    generation: u64,
}

impl RecordingsCatalog {
    /// Empty catalog. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(
        store: Arc<RecordingStore>,
        names: Arc<NameOverrideStore>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        Self {
            store,
            names,
            prober,
            entries: Vec::new(),
            views: DerivedViewCache::new(),
            generation: 0,
        }
    }

    /// Entries, newest first. Durations may still be unprobed.
    pub fn recordings(&self) -> &[Recording] {
        &self.entries
    }

    /// Entry with the given id.
    pub fn get(&self, id: Uuid) -> Option<&Recording> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Entry backed by the given file.
    pub fn find_by_file(&self, file_ref: &FileRef) -> Option<&Recording> {
        self.entries.iter().find(|r| &r.file_ref == file_ref)
    }

    /// Entry ids in catalog order.
    pub fn ordered_ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|r| r.id).collect()
    }

    /// Current order for every cached view, to apply outside the catalog lock.
    pub fn order_sync(&self) -> OrderSync {
        self.views.order_sync(self.generation, self.ordered_ids())
    }

    /// Detail view cache.
    pub fn views(&self) -> &DerivedViewCache {
        &self.views
    }

    /// Re-synchronize with the recordings directory.
    ///
    /// `in_progress` is the file of a capture that is still being written;
    /// its entry is marked processing and left unprobed.
    #[instrument(skip(self, in_progress), fields(in_progress = ?in_progress.map(FileRef::key)))]
    pub fn refresh(&mut self, in_progress: Option<&FileRef>) -> &[Recording] {
        let mut existing: HashMap<FileRef, Recording> = self
            .entries
            .drain(..)
            .map(|r| (r.file_ref.clone(), r))
            .collect();

        let mut refreshed: Vec<Recording> = self
            .store
            .list_recordings()
            .into_iter()
            .map(|stored| {
                let processing = in_progress == Some(&stored.file_ref);

                match existing.remove(&stored.file_ref) {
                    Some(mut recording) => {
                        if processing {
                            recording.status = RecordingStatus::Processing;
                            recording.duration = None;
                        } else if recording.status == RecordingStatus::Processing {
                            // The file grew since it was last seen
                            recording.status = RecordingStatus::Completed;
                            recording.duration = None;
                        }
                        recording
                    }
                    None => Recording {
                        id: Uuid::new_v4(),
                        name: self.names.name_or(&stored.file_ref, UNNAMED),
                        created: stored.created,
                        duration: None,
                        status: if processing {
                            RecordingStatus::Processing
                        } else {
                            RecordingStatus::Completed
                        },
                        file_ref: stored.file_ref,
                    },
                }
            })
            .collect();

        for gone in existing.into_values() {
            debug!(file_ref = %gone.file_ref, "Recording left the directory");
            self.views.invalidate(gone.id);
        }

        refreshed.reverse();
        self.entries = refreshed;
        self.generation += 1;

        info!(count = self.entries.len(), "Catalog refreshed");

        &self.entries
    }

    /// Probe every completed entry that has no duration yet.
    ///
    /// A failed probe is logged and recorded as 0; it is not retried until the
    /// entry is re-created or its status changes.
    pub fn resolve_durations(&mut self) {
        for recording in &mut self.entries {
            if recording.duration.is_none() && recording.status == RecordingStatus::Completed {
                recording.duration = Some(probe_or_zero(self.prober.as_ref(), &recording.file_ref));
            }
        }
    }

    /// Duration of one entry, probing it on first request.
    #[track_caller]
    pub fn duration(&mut self, id: Uuid) -> ClipResult<f64> {
        let prober = Arc::clone(&self.prober);
        let recording = self.entry_mut(id)?;

        if let Some(duration) = recording.duration {
            return Ok(duration);
        }
        if recording.status == RecordingStatus::Processing {
            return Ok(0.0);
        }

        let duration = probe_or_zero(prober.as_ref(), &recording.file_ref);
        recording.duration = Some(duration);
        Ok(duration)
    }

    /// Rename the entry with the given id.
    #[track_caller]
    pub fn rename(&mut self, id: Uuid, name: &str) -> ClipResult<()> {
        let file_ref = self.file_of(id)?;
        self.rename_file(&file_ref, name)
    }

    /// Rename the entry backed by `file_ref`.
    ///
    /// The override store is written first; the entry changes only once that
    /// succeeded, so both always agree.
    #[track_caller]
    #[instrument(skip(self, file_ref), fields(file_ref = %file_ref))]
    pub fn rename_file(&mut self, file_ref: &FileRef, name: &str) -> ClipResult<()> {
        self.names.set_name(file_ref, name)?;

        if let Some(recording) = self.entries.iter_mut().find(|r| &r.file_ref == file_ref) {
            recording.name = name.to_string();
            let id = recording.id;
            self.views.invalidate(id);
            info!(recording_id = %id, "Recording renamed");
        } else {
            debug!("Renamed a file that is not in the catalog yet");
        }

        Ok(())
    }

    /// Delete the entry with the given id.
    ///
    /// An unknown id reports [`ClipError::RecordingNotFound`].
    #[track_caller]
    pub fn delete(&mut self, id: Uuid) -> ClipResult<()> {
        let file_ref = self.file_of(id)?;
        self.delete_file(&file_ref)
    }

    /// Delete the file, then its entry, stored name and cached view.
    ///
    /// If the file cannot be removed nothing else changes. If it was already
    /// gone the in-memory state is purged and [`ClipError::FileNotFound`] is
    /// still returned so callers can tell. If the stored name cannot be
    /// dropped, the file and entry are gone anyway and the store error is
    /// returned; deleting the file again retries the name removal.
    #[track_caller]
    #[instrument(skip(self, file_ref), fields(file_ref = %file_ref))]
    pub fn delete_file(&mut self, file_ref: &FileRef) -> ClipResult<()> {
        let outcome = self.store.delete(file_ref);

        if outcome.as_ref().is_err_and(|e| !e.is_not_found()) {
            return outcome;
        }
        if outcome.is_err() {
            debug!("File already gone, purging catalog state");
        }

        let removed = self
            .entries
            .iter()
            .position(|r| &r.file_ref == file_ref)
            .map(|index| self.entries.remove(index));

        let forgotten = self.names.remove(file_ref);
        if let Err(e) = &forgotten {
            warn!(error = %e, "Failed to drop stored name for deleted recording");
        }

        if let Some(recording) = removed {
            self.views.invalidate(recording.id);
            self.generation += 1;
            info!(recording_id = %recording.id, "Recording deleted");
        }

        outcome.and(forgotten)
    }

    /// Cached detail view for `id`, built from the current order on first use.
    #[track_caller]
    pub fn derived_view(&mut self, id: Uuid) -> ClipResult<SharedDetail> {
        let file_ref = self.file_of(id)?;
        let ordered = self.ordered_ids();
        let generation = self.generation;
        Ok(self.views.get_or_insert_with(id, || {
            RecordingDetail::new(id, file_ref, ordered).stamped(generation)
        }))
    }

    #[track_caller]
    fn file_of(&self, id: Uuid) -> ClipResult<FileRef> {
        self.get(id)
            .map(|r| r.file_ref.clone())
            .ok_or_else(|| not_found(id))
    }

    #[track_caller]
    fn entry_mut(&mut self, id: Uuid) -> ClipResult<&mut Recording> {
        self.entries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))
    }
}

#[track_caller]
fn not_found(id: Uuid) -> ClipError {
    ClipError::RecordingNotFound {
        id,
        location: ErrorLocation::from(Location::caller()),
    }
}

fn probe_or_zero(prober: &dyn MediaProber, file_ref: &FileRef) -> f64 {
    match prober.probe(file_ref.path()) {
        Ok(duration) => duration,
        Err(e) => {
            warn!(file_ref = %file_ref, error = %e, "Duration probe failed, using 0");
            0.0
        }
    }
}
