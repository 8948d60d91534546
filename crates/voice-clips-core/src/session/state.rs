/// Capture session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No capture in progress.
    #[default]
    Idle,
    /// Audio is being written.
    Recording,
    /// A capture is open but suspended.
    Paused,
}
