use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{SubmissionStatus, Verdict};

/// Language assumed when a submission does not name one.
pub const DEFAULT_LANGUAGE: &str = "java";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i32,
    pub user_id: i32,
    pub problem_id: i32,
    pub contest_id: i32,
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    /// Set together with a terminal `status`, never changed afterwards.
    pub verdict: Option<Verdict>,
    /// Program output of the first mismatching test case.
    pub output: Option<String>,
    /// Compiler diagnostics, runtime error text, or judge fault message.
    pub error: Option<String>,
    /// Longest run-stage wall time across attempted test cases (milliseconds).
    pub execution_time_ms: Option<i32>,
    /// Not measured by the process sandbox.
    pub memory_used_kb: Option<i32>,
    pub submitted_at: DateTime<Utc>,
    /// Whether score effects of an acceptance were already applied.
    #[serde(default)]
    pub scored: bool,
}

/// Fields supplied by ingress when a submission is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewSubmission {
    pub user_id: i32,
    pub problem_id: i32,
    pub contest_id: i32,
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission {id}: illegal transition {from} -> {to}")]
pub struct TransitionError {
    pub id: i32,
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

impl Submission {
    /// `PENDING -> JUDGING`.
    pub fn begin_judging(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionStatus::Judging)
    }

    /// `JUDGING -> terminal`, recording the verdict and diagnostics.
    pub fn finish(
        &mut self,
        verdict: Verdict,
        output: Option<String>,
        error: Option<String>,
    ) -> Result<(), TransitionError> {
        self.transition(verdict.into())?;
        self.verdict = Some(verdict);
        self.output = output;
        self.error = error;
        Ok(())
    }

    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }

    pub fn view(&self) -> SubmissionView {
        SubmissionView::from(self)
    }

    fn transition(&mut self, to: SubmissionStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Public projection of a submission, published to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: i32,
    pub user_id: i32,
    pub problem_id: i32,
    pub contest_id: i32,
    pub status: SubmissionStatus,
    pub verdict: Option<Verdict>,
    pub output: Option<String>,
    pub error: Option<String>,
    pub execution_time_ms: Option<i32>,
    pub memory_used_kb: Option<i32>,
    pub submitted_at: DateTime<Utc>,
    pub language: String,
}

impl From<&Submission> for SubmissionView {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            contest_id: s.contest_id,
            status: s.status,
            verdict: s.verdict,
            output: s.output.clone(),
            error: s.error.clone(),
            execution_time_ms: s.execution_time_ms,
            memory_used_kb: s.memory_used_kb,
            submitted_at: s.submitted_at,
            language: s.language.clone(),
        }
    }
}
