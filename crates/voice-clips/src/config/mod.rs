mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod stopwatch_config;
mod storage_config;

use std::path::PathBuf;

use directories::ProjectDirs;

pub(crate) use {
    capture_config::CaptureSettings, config::Config, logging_config::LoggingConfig,
    stopwatch_config::StopwatchConfig, storage_config::StorageConfig,
};

pub(crate) const QUALIFIER: &str = "com";
pub(crate) const ORGANIZATION: &str = "voice-clips";
pub(crate) const APPLICATION: &str = "Voice-Clips";
/// Used when the platform reports no home directory.
pub(crate) const FALLBACK_DATA_DIR: &str = "voice-clips-data";

pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 12_000;
pub(crate) const DEFAULT_CHANNELS: u16 = 1;
pub(crate) const DEFAULT_EXTENSION: &str = "wav";
pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
pub(crate) const DEFAULT_LOG_FILTER: &str = "voice_clips=info,voice_clips_core=info";

pub(crate) fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

pub(crate) fn default_channels() -> u16 {
    DEFAULT_CHANNELS
}

pub(crate) fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Platform data directory for voice-clips.
pub(crate) fn default_data_dir() -> PathBuf {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

pub(crate) fn default_recordings_dir() -> PathBuf {
    default_data_dir().join("recordings")
}

pub(crate) fn default_names_file() -> PathBuf {
    default_data_dir().join("names.toml")
}

pub(crate) fn default_log_dir() -> PathBuf {
    default_data_dir().join("logs")
}
