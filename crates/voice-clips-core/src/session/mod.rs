mod clock;
mod recording_session;
mod state;
mod stopwatch;
mod ticker;

pub(crate) use {stopwatch::Stopwatch, ticker::Ticker};

pub use {
    clock::{Clock, SystemClock},
    recording_session::{BeginOutcome, RecordingSession},
    state::SessionState,
    stopwatch::format_elapsed,
};
