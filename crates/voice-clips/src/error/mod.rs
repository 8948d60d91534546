use voice_clips_core::ClipError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the voice-clips binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the recording core.
    #[error("Recording error: {source} {location}")]
    Clip {
        /// The underlying core error.
        #[source]
        source: ClipError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem or terminal operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A typed command could not be understood.
    #[error("Invalid command: {reason} {location}")]
    InvalidCommand {
        /// What was wrong with the input.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<ClipError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<ClipError> for AppError {
    #[track_caller]
    fn from(source: ClipError) -> Self {
        AppError::Clip {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
