use chrono::{DateTime, Local};
use tracing::debug;

/// Filename prefix for auto-named captures.
pub(crate) const NAME_PREFIX: &str = "recording_";

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generates `recording_<YYYYMMDDHHMMSS>.<ext>` filenames.
///
/// Timestamps only have second resolution, so a second name requested within
/// the same second gets a `_<n>` suffix instead of colliding with the first.
#[derive(Debug)]
pub struct UniqueNamer {
    extension: String,
    last_stamp: Option<String>,
    repeats: u32,
}

impl UniqueNamer {
    /// Create a namer producing files with the given extension (without dot).
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            last_stamp: None,
            repeats: 0,
        }
    }

    /// Extension appended to generated names.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Generate a filename for a capture started at `now`.
    pub fn generate_name(&mut self, now: DateTime<Local>) -> String {
        let stamp = now.format(STAMP_FORMAT).to_string();

        if self.last_stamp.as_deref() == Some(stamp.as_str()) {
            self.repeats += 1;
        } else {
            self.last_stamp = Some(stamp.clone());
            self.repeats = 0;
        }

        let name = if self.repeats == 0 {
            format!("{NAME_PREFIX}{stamp}.{}", self.extension)
        } else {
            format!("{NAME_PREFIX}{stamp}_{}.{}", self.repeats, self.extension)
        };

        debug!(name = %name, "Generated recording name");

        name
    }
}
