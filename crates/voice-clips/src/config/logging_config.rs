use crate::config::{default_log_dir, default_log_filter};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Directory for the daily rolling log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            log_dir: default_log_dir(),
        }
    }
}
