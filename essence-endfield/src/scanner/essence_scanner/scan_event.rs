use strum_macros::Display;

use super::essence_scanner_window_info::GridCell;
use super::field::ItemReading;
use crate::game_data::TargetDefinition;

/// Keep/discard verdict for one essence.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Matches the first listed weapon.
    Kept(TargetDefinition),
    Discarded,
}

impl Decision {
    pub fn is_kept(&self) -> bool {
        matches!(self, Decision::Kept(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AbortReason {
    /// The game window is not focused, or it can no longer be captured.
    #[strum(serialize = "focus-lost")]
    FocusLost,
    #[strum(serialize = "cancelled")]
    Cancelled,
    /// A click could not be issued; the cursor may no longer agree with the screen.
    #[strum(serialize = "input-failed")]
    InputFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Running { cursor: usize },
    Completed,
    Aborted(AbortReason),
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Completed | ScanState::Aborted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Items fully processed, including the decision step.
    pub scanned: usize,
    pub kept: usize,
    pub discarded: usize,
    /// Lock or unlock clicks issued.
    pub toggled: usize,
}

/// Final outcome of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub state: ScanState,
    pub summary: ScanSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started { total: usize },
    CellRecognized { cell: GridCell, reading: ItemReading },
    CellDecided { cell: GridCell, decision: Decision, toggled: bool },
    Completed(ScanSummary),
    Aborted { reason: AbortReason, summary: ScanSummary },
}
