mod cache;
mod recording_detail;

pub use {
    cache::{DerivedViewCache, OrderSync, SharedDetail},
    recording_detail::{Advice, RecordingDetail},
};
