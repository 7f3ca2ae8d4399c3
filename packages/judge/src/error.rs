use common::StorageError;
use common::entity::TransitionError;
use thiserror::Error;

/// Faults inside the judging pipeline.
///
/// Expected judging failures (compile errors, timeouts, wrong answers) are not errors;
/// they travel as values and end in a verdict. A `JudgeError` is converted into a
/// terminal `RUNTIME_ERROR` at the coordinator boundary.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Transition(#[from] TransitionError),
}

pub type Result<T> = std::result::Result<T, JudgeError>;

/// Admission failures of the judge pool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Judge queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },

    #[error("Judge pool is shut down")]
    Closed,
}

/// Errors returned to the caller that creates a submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
