use crate::types::geometry::SessionShot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UndoOutcome {
    Removed(SessionShot),
    NothingToUndo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiscardOutcome {
    Discarded { shots: usize },
    NothingToDiscard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmStatus {
    NothingToConfirm,
    Confirmed,
    Mixed,
    AllFailed,
}

impl ConfirmStatus {
    pub fn from_counts(success_count: usize, error_count: usize) -> Self {
        match (success_count, error_count) {
            (0, 0) => Self::NothingToConfirm,
            (_, 0) => Self::Confirmed,
            (0, _) => Self::AllFailed,
            _ => Self::Mixed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NothingToConfirm => "nothing to confirm",
            Self::Confirmed => "confirmed",
            Self::Mixed => "partially saved",
            Self::AllFailed => "all failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub item_id: String,
    pub sequence: u64,
    pub reason: String,
    /// The arrow was gone from the store, so the shot was never submitted.
    pub orphaned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmReport {
    pub container_id: String,
    pub status: ConfirmStatus,
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<SubmissionFailure>,
    /// Failed shots put back into the buffer for another attempt.
    pub retained: usize,
}

impl ConfirmReport {
    pub fn nothing_to_confirm(container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            status: ConfirmStatus::NothingToConfirm,
            success_count: 0,
            error_count: 0,
            failures: Vec::new(),
            retained: 0,
        }
    }
}
