use crate::store::FileRef;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Processing status of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    /// The capture is still being written.
    Processing,
    /// The file is complete.
    Completed,
}

/// One catalog entry per recording file.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) created: DateTime<Local>,
    pub(crate) duration: Option<f64>,
    pub(crate) status: RecordingStatus,
    pub(crate) file_ref: FileRef,
}

impl Recording {
    /// Stable id, kept for as long as the file exists.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation time of the backing file.
    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    /// Playable length in seconds, `None` until probed.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Playable length in seconds, 0 until probed.
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Processing status.
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Backing file.
    pub fn file_ref(&self) -> &FileRef {
        &self.file_ref
    }
}
