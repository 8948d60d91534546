use crate::SessionState;

/// Notifications published by [`VoiceClips`](crate::VoiceClips).
///
/// Presentation layers subscribe instead of polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipEvent {
    /// The capture session moved to a new state.
    SessionStateChanged(SessionState),
    /// The stopwatch display changed (formatted `MM:SS:hh`).
    ElapsedChanged(String),
    /// Catalog entries were added, removed, renamed or re-ordered.
    CatalogChanged,
}
