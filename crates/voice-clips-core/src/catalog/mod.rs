mod recording;
mod recordings_catalog;

pub use {
    recording::{Recording, RecordingStatus},
    recordings_catalog::{RecordingsCatalog, UNNAMED},
};
