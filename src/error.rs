use thiserror::Error;

use crate::model::{PeriodId, TaskId};

/// Failures raised by period placement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The candidate still overlaps another period after task-boundary resolution.
    #[error("range overlaps existing period {period_id}")]
    Conflict { period_id: PeriodId },

    /// The candidate lies inside the task bar, so neither side can be kept.
    #[error("range lies inside the task's own span")]
    TaskConflict,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("period {0} not found")]
    PeriodNotFound(PeriodId),
}

impl SchedulerError {
    /// Conflicts are recoverable by the UI; everything else points at a desync.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::TaskConflict)
    }
}

/// Failures reported by a `RemoteStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no stored row for task {0}")]
    MissingRow(TaskId),
}

/// Failures from a coordinated scheduler + store operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
