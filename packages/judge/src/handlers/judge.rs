use std::sync::Arc;

use common::entity::{Submission, TestCase};
use common::event::{ContestSubmission, Event, LeaderboardRefresh, SubmissionUpdated};
use common::{EntityStore, Publisher, SubmissionStatus, Verdict};
use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::models::evaluator::Evaluator;
use crate::models::sandbox::Sandbox;
use crate::models::scoring::{ResubmissionPolicy, ScoreUpdater};

/// Drives one submission from `PENDING` to a terminal state.
///
/// Never propagates a fault: anything unexpected before the verdict is persisted ends the
/// submission as `RUNTIME_ERROR` with the fault message as its error.
pub struct JudgeCoordinator {
    store: Arc<dyn EntityStore>,
    evaluator: Evaluator,
    scores: ScoreUpdater,
    publisher: Arc<dyn Publisher>,
}

impl JudgeCoordinator {
    pub fn new(
        store: Arc<dyn EntityStore>,
        sandbox: Arc<dyn Sandbox>,
        publisher: Arc<dyn Publisher>,
        policy: ResubmissionPolicy,
    ) -> Self {
        Self {
            scores: ScoreUpdater::new(store.clone(), policy),
            evaluator: Evaluator::new(sandbox),
            store,
            publisher,
        }
    }

    /// Judge a submission, returning its final record.
    ///
    /// `None` only when the submission cannot be read or saved at all.
    #[instrument(skip(self))]
    pub async fn judge(&self, submission_id: i32) -> Option<Submission> {
        match self.run_pipeline(submission_id).await {
            Ok(submission) => Some(submission),
            Err(e) => self.fail(submission_id, &e.to_string()).await,
        }
    }

    async fn run_pipeline(&self, submission_id: i32) -> Result<Submission> {
        let mut submission = self.store.submission(submission_id).await?;
        if submission.status != SubmissionStatus::Pending {
            warn!(status = %submission.status, "Submission is not pending, skipping");
            return Ok(submission);
        }

        submission.begin_judging()?;
        let mut submission = self.store.save_submission(submission).await?;
        info!(problem_id = submission.problem_id, language = %submission.language, "Judging");
        self.notify(SubmissionUpdated(submission.view())).await;

        let test_cases: Vec<TestCase> = self
            .store
            .test_cases(submission.problem_id)
            .await?
            .into_iter()
            .filter(|tc| !tc.is_hidden)
            .collect();
        debug!(test_cases = test_cases.len(), "Loaded test cases");

        let outcome = self
            .evaluator
            .evaluate(&test_cases, &submission.code, &submission.language)
            .await;

        submission.execution_time_ms = outcome.time_used;
        submission.finish(outcome.verdict, outcome.output, outcome.error)?;
        let submission = self.store.save_submission(submission).await?;
        info!(
            verdict = %outcome.verdict,
            passed = outcome.passed_tests,
            total = outcome.total_tests,
            elapsed_ms = ?submission.execution_time_ms,
            "Judging finished"
        );
        self.notify_final(&submission).await;

        if outcome.verdict == Verdict::Accepted {
            let effect = self.scores.apply(submission.id).await?;
            debug!(?effect, "Score updated");
            self.notify(LeaderboardRefresh {
                contest_id: submission.contest_id,
                user_id: submission.user_id,
                problem_id: submission.problem_id,
                submission_id: submission.id,
            })
            .await;
        }

        Ok(submission)
    }

    /// Convert a judging fault into a terminal `RUNTIME_ERROR`.
    ///
    /// A submission that already holds a verdict keeps it.
    pub async fn fail(&self, submission_id: i32, message: &str) -> Option<Submission> {
        let mut submission = match self.store.submission(submission_id).await {
            Ok(submission) => submission,
            Err(e) => {
                error!(
                    error = message,
                    reload_error = %e,
                    "Judging failed and submission is unreadable"
                );
                return None;
            }
        };

        if submission.is_final() {
            error!(error = message, status = %submission.status, "Fault after verdict, keeping it");
            return Some(submission);
        }

        error!(error = message, "Judging failed, recording runtime error");
        if submission.status == SubmissionStatus::Pending {
            submission.begin_judging().ok()?;
        }
        submission
            .finish(Verdict::RuntimeError, None, Some(message.to_string()))
            .ok()?;

        match self.store.save_submission(submission).await {
            Ok(submission) => {
                self.notify_final(&submission).await;
                Some(submission)
            }
            Err(e) => {
                error!(error = %e, "Failed to persist runtime error");
                None
            }
        }
    }

    async fn notify_final(&self, submission: &Submission) {
        self.notify(SubmissionUpdated(submission.view())).await;
        self.notify(ContestSubmission(submission.view())).await;
    }

    async fn notify<E: Event>(&self, event: E) {
        let event = event.to_generic_event();
        if let Err(e) = self.publisher.publish(&event.topic, event.payload).await {
            warn!(topic = %event.topic, error = %e, "Failed to publish event");
        }
    }
}
