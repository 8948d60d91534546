use crate::SessionState;

use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

/// Recording core errors with source location tracking.
#[derive(Error, Debug)]
pub enum ClipError {
    /// Capture device could not open the target file.
    #[error("Recorder init failed for {path:?}: {reason} {location}")]
    RecorderInitFailed {
        /// Target file the device was asked to open.
        path: PathBuf,
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Referenced recording file does not exist.
    #[error("Recording file not found: {path:?} {location}")]
    FileNotFound {
        /// Path of the missing file.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording file could not be removed.
    #[error("Failed to delete {path:?}: {source} {location}")]
    DeleteFailed {
        /// Path of the file that could not be removed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Media file could not be opened to read its duration.
    #[error("Duration probe failed for {path:?}: {reason} {location}")]
    DurationProbeFailed {
        /// Path of the probed file.
        path: PathBuf,
        /// Description of the probe failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not allowed in the current session state.
    #[error("Cannot {operation} while {state:?} {location}")]
    PreconditionViolation {
        /// Operation that was attempted.
        operation: &'static str,
        /// Session state at the time of the call.
        state: SessionState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No catalog entry has the given id.
    #[error("No recording with id {id} {location}")]
    RecordingNotFound {
        /// Id that was looked up.
        id: Uuid,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture device operation failed on an open target.
    #[error("Capture device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Name override store could not be read or written.
    #[error("Name store error: {reason} {location}")]
    StoreError {
        /// Description of the persistence error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl ClipError {
    /// True when the referenced file was already gone.
    ///
    /// Callers deleting idempotently treat this as success.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClipError::FileNotFound { .. })
    }

    /// True when the error reports a caller bug (invalid state transition).
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, ClipError::PreconditionViolation { .. })
    }
}

/// Result type alias using [`ClipError`].
pub type Result<T> = std::result::Result<T, ClipError>;
