use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status of a submission during the judging lifecycle.
///
/// `Pending -> Judging -> {terminal}`. The five terminal values mirror [`Verdict`]
/// one to one; nothing leaves a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Accepted by ingress, waiting for a judge worker.
    #[default]
    Pending,
    /// Picked up by a worker; compiling or running test cases.
    Judging,
    /// All judged test cases passed.
    Accepted,
    /// Output did not match expected output.
    WrongAnswer,
    /// Program crashed, exited non-zero, or the judge itself failed.
    RuntimeError,
    /// Exceeded the execution timeout.
    TimeLimitExceeded,
    /// Failed to compile, or compilation timed out.
    CompilationError,
}

impl SubmissionStatus {
    /// Returns true if this is a final verdict (judging is complete).
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending | Self::Judging)
    }

    /// Returns true if this is a successful verdict.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        match self {
            Self::Pending => next == Self::Judging,
            Self::Judging => next.is_final(),
            _ => false,
        }
    }

    /// The verdict carried by a terminal status.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Pending | Self::Judging => None,
            Self::Accepted => Some(Verdict::Accepted),
            Self::WrongAnswer => Some(Verdict::WrongAnswer),
            Self::RuntimeError => Some(Verdict::RuntimeError),
            Self::TimeLimitExceeded => Some(Verdict::TimeLimitExceeded),
            Self::CompilationError => Some(Verdict::CompilationError),
        }
    }

    /// All possible status values.
    pub const ALL: &'static [SubmissionStatus] = &[
        Self::Pending,
        Self::Judging,
        Self::Accepted,
        Self::WrongAnswer,
        Self::RuntimeError,
        Self::TimeLimitExceeded,
        Self::CompilationError,
    ];

    /// All final verdict statuses.
    pub const FINAL: &'static [SubmissionStatus] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::RuntimeError,
        Self::TimeLimitExceeded,
        Self::CompilationError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Judging => "JUDGING",
            Self::Accepted => "ACCEPTED",
            Self::WrongAnswer => "WRONG_ANSWER",
            Self::RuntimeError => "RUNTIME_ERROR",
            Self::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Self::CompilationError => "COMPILATION_ERROR",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status '{invalid}'. Valid values: {}", valid_statuses())]
pub struct ParseStatusError {
    invalid: String,
}

fn valid_statuses() -> String {
    SubmissionStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
            })
    }
}

/// Closed classification of a completed judging attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    RuntimeError,
    TimeLimitExceeded,
    CompilationError,
}

impl Verdict {
    pub const ALL: &'static [Verdict] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::RuntimeError,
        Self::TimeLimitExceeded,
        Self::CompilationError,
    ];

    pub fn as_str(&self) -> &'static str {
        SubmissionStatus::from(*self).as_str()
    }
}

impl From<Verdict> for SubmissionStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Accepted => Self::Accepted,
            Verdict::WrongAnswer => Self::WrongAnswer,
            Verdict::RuntimeError => Self::RuntimeError,
            Verdict::TimeLimitExceeded => Self::TimeLimitExceeded,
            Verdict::CompilationError => Self::CompilationError,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
