//! Plain-text rendering for the console front end.

use std::time::Duration;

use voice_clips_core::{
    Advice, Recording, RecordingDetail, RecordingStatus, SessionState, format_elapsed,
};

/// Command reference printed by `help`.
pub(crate) const HELP: &str = "\
Commands:
  record | r            start a new recording, or resume the paused one
  pause  | p            pause the running recording
  save   | s            finish the recording and add it to the list
  list   | ls           show all recordings, newest first
  refresh               re-scan the recordings folder
  rename <n> <name>     rename recording n
  delete <n>            delete recording n
  open <n>              show details for recording n
  next | prev           move the open details to an adjacent recording
  advice <text>         attach advice to the open details
  help                  show this text
  quit                  exit";

/// Numbered listing of the catalog.
pub(crate) fn render_listing(recordings: &[Recording]) -> String {
    if recordings.is_empty() {
        return "No recordings yet. Type 'record' to start one.".to_string();
    }

    let width = recordings
        .iter()
        .map(|r| r.name().chars().count())
        .max()
        .unwrap_or(0);

    recordings
        .iter()
        .enumerate()
        .map(|(index, recording)| {
            format!(
                "{:>3}. {:<width$}  {}  {}{}",
                index + 1,
                recording.name(),
                render_duration(recording),
                recording.created().format("%Y-%m-%d %H:%M"),
                match recording.status() {
                    RecordingStatus::Processing => "  [processing]",
                    RecordingStatus::Completed => "",
                },
                width = width,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail view of the recording currently selected in `detail`.
pub(crate) fn render_detail(detail: &RecordingDetail, recording: Option<&Recording>) -> String {
    let Some(recording) = recording else {
        return "That recording is no longer available.".to_string();
    };

    let position = format!(
        "{}{}",
        if detail.at_beginning() { " " } else { "<" },
        if detail.at_end() { " " } else { ">" }
    );
    let advice = match detail.advice() {
        Advice::Loading => "Loading advice...",
        Advice::Ready(text) => text.as_str(),
    };

    format!(
        "[{}] {}\n     length   {}\n     recorded {}\n     file     {}\n     advice   {}",
        position,
        recording.name(),
        render_duration(recording),
        recording.created().format("%Y-%m-%d %H:%M:%S"),
        recording.file_ref().file_name(),
        advice
    )
}

/// One-line session status.
pub(crate) fn render_state(state: SessionState, elapsed: &str) -> String {
    match state {
        SessionState::Idle => "Ready".to_string(),
        SessionState::Recording => format!("Recording {}", elapsed),
        SessionState::Paused => format!("Paused    {}", elapsed),
    }
}

fn render_duration(recording: &Recording) -> String {
    match recording.status() {
        RecordingStatus::Processing => "--:--:--".to_string(),
        RecordingStatus::Completed => {
            format_elapsed(Duration::from_secs_f64(recording.duration_secs().max(0.0)))
        }
    }
}
