use crate::config::{default_names_file, default_recordings_dir};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where recordings and their display names live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding every recording.
    #[serde(default = "default_recordings_dir")]
    pub recordings_dir: PathBuf,

    /// TOML file with display names and the default-name counter.
    #[serde(default = "default_names_file")]
    pub names_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            names_file: default_names_file(),
        }
    }
}
