mod file_accessor;
mod file_ref;
mod name_overrides;
pub(crate) mod naming;
mod recording_store;

pub use {
    file_accessor::{FileAccessor, ListedFile, SystemFileAccessor},
    file_ref::FileRef,
    name_overrides::NameOverrideStore,
    naming::UniqueNamer,
    recording_store::{PreparedRecorder, RecordingStore, StoredRecording},
};
