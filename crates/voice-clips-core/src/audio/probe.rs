use crate::{ClipError, ClipResult};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Reads the total playable time of a media file.
pub trait MediaProber: Send + Sync {
    /// Duration of the file at `path`, in seconds.
    fn probe(&self, path: &Path) -> ClipResult<f64>;
}

/// [`MediaProber`] that reads WAV headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavProber;

impl MediaProber for WavProber {
    #[track_caller]
    #[instrument(skip(self))]
    fn probe(&self, path: &Path) -> ClipResult<f64> {
        let reader = hound::WavReader::open(path).map_err(|e| ClipError::DurationProbeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(ClipError::DurationProbeFailed {
                path: path.to_path_buf(),
                reason: "WAV header has a sample rate of 0".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // duration() counts frames, not interleaved samples
        let seconds = f64::from(reader.duration()) / f64::from(spec.sample_rate);

        debug!(seconds, "Probed duration");

        Ok(seconds)
    }
}
