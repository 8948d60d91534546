use crate::store::FileRef;

use uuid::Uuid;

/// Advice text attached to a detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Advice {
    /// Nothing delivered yet.
    #[default]
    Loading,
    /// Text delivered by the advice collaborator.
    Ready(String),
}

/// Per-recording detail state with adjacent-recording navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingDetail {
    recording_id: Uuid,
    file_ref: FileRef,
    ordered: Vec<Uuid>,
    current_index: usize,
    advice: Advice,
    /// Catalog generation of `ordered`.
    generation: u64,
}

impl RecordingDetail {
    /// Detail for `recording_id`, positioned on it within `ordered`.
    pub fn new(recording_id: Uuid, file_ref: FileRef, ordered: Vec<Uuid>) -> Self {
        let current_index = ordered
            .iter()
            .position(|id| *id == recording_id)
            .unwrap_or(0);

        Self {
            recording_id,
            file_ref,
            ordered,
            current_index,
            advice: Advice::Loading,
            generation: 0,
        }
    }

    /// Mark the order as belonging to catalog `generation`.
    pub(crate) fn stamped(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Recording this detail was opened for.
    pub fn recording_id(&self) -> Uuid {
        self.recording_id
    }

    /// Backing file of the recording this detail was opened for.
    pub fn file_ref(&self) -> &FileRef {
        &self.file_ref
    }

    /// Recording currently shown, after any navigation.
    pub fn current(&self) -> Option<Uuid> {
        self.ordered.get(self.current_index).copied()
    }

    /// Position of the current recording in catalog order.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// True on the first recording (or when there are none).
    pub fn at_beginning(&self) -> bool {
        self.current_index == 0
    }

    /// True on the last recording (or when there are none).
    pub fn at_end(&self) -> bool {
        self.current_index + 1 >= self.ordered.len()
    }

    /// Step to the previous recording. Returns false at the beginning.
    pub fn move_to_previous(&mut self) -> bool {
        if self.at_beginning() {
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Step to the next recording. Returns false at the end.
    pub fn move_to_next(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Advice state.
    pub fn advice(&self) -> &Advice {
        &self.advice
    }

    /// Store advice text delivered for this recording.
    pub fn set_advice(&mut self, text: impl Into<String>) {
        self.advice = Advice::Ready(text.into());
    }

    /// Adopt the order of catalog `generation` unless a newer one was seen.
    pub(crate) fn sync_order_at(&mut self, generation: u64, ordered: &[Uuid]) -> bool {
        if generation < self.generation {
            return false;
        }
        self.generation = generation;
        self.sync_order(ordered);
        true
    }

    /// Adopt a new catalog order, staying on the same recording if it survives.
    pub(crate) fn sync_order(&mut self, ordered: &[Uuid]) {
        let current = self.current();
        self.ordered = ordered.to_vec();
        self.current_index = current
            .and_then(|id| self.ordered.iter().position(|o| *o == id))
            .unwrap_or_else(|| self.current_index.min(self.ordered.len().saturating_sub(1)));
    }
}
