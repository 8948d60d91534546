//! Voice Clips Core Library
//!
//! Capture short audio clips with pause/resume, keep them on disk under
//! generated names, and browse them with user-editable display names.
//!
//! # Example
//!
//! ```no_run
//! use voice_clips_core::{ClipResult, Collaborators, NameOverrideStore, VoiceClips, VoiceClipsOptions};
//!
//! use std::{path::Path, sync::Arc, thread::sleep, time::Duration};
//!
//! fn main() -> ClipResult<()> {
//!     let names = Arc::new(NameOverrideStore::load(Path::new("names.toml"))?);
//!     let clips = VoiceClips::new(
//!         VoiceClipsOptions::new("recordings"),
//!         names,
//!         Collaborators::default(),
//!     );
//!
//!     clips.begin_capture()?;
//!     sleep(Duration::from_secs(3));
//!     clips.pause_capture()?;
//!     clips.finalize_capture()?;
//!
//!     for recording in clips.catalog() {
//!         println!("{} ({:.1}s)", recording.name(), recording.duration_secs());
//!     }
//!     Ok(())
//! }
//! ```

mod audio;
mod catalog;
mod error;
mod events;
mod session;
mod store;
mod views;
mod voice_clips;

pub use {
    audio::{CaptureConfig, CaptureDevice, CaptureHandle, CpalCaptureDevice, MediaProber, WavProber},
    catalog::{Recording, RecordingStatus, RecordingsCatalog, UNNAMED},
    error::{ClipError, Result as ClipResult},
    events::ClipEvent,
    session::{BeginOutcome, Clock, RecordingSession, SessionState, SystemClock, format_elapsed},
    store::{
        FileAccessor, FileRef, ListedFile, NameOverrideStore, PreparedRecorder, RecordingStore,
        StoredRecording, SystemFileAccessor, UniqueNamer,
    },
    views::{Advice, DerivedViewCache, OrderSync, RecordingDetail, SharedDetail},
    voice_clips::{Collaborators, VoiceClips, VoiceClipsOptions},
};
