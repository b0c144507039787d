use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("No pending tasks")]
    EmptyQueue,

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Duplicate task identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Scheduler closed")]
    Closed,

    #[error("Timed out after {0}ms waiting for a task")]
    Timeout(u64),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl SchedulerError {
    pub fn unknown_task(id: &impl std::fmt::Debug) -> Self {
        Self::UnknownTask(format!("{:?}", id))
    }

    pub fn duplicate(id: &impl std::fmt::Debug) -> Self {
        Self::DuplicateIdentifier(format!("{:?}", id))
    }

    /// Stable short code used by the CLI output and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyQueue => "empty_queue",
            Self::UnknownTask(_) => "unknown_task",
            Self::DuplicateIdentifier(_) => "duplicate_identifier",
            Self::Closed => "closed",
            Self::Timeout(_) => "timeout",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
