use std::sync::Arc;

use common::EntityStore;
use common::entity::{NewSubmission, Submission};
use tracing::info;

use crate::error::SubmitError;
use crate::models::pool::JudgePool;

/// Submission ingress: persists a `PENDING` submission and hands it to the pool.
pub struct SubmissionService {
    store: Arc<dyn EntityStore>,
    pool: JudgePool,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn EntityStore>, pool: JudgePool) -> Self {
        Self { store, pool }
    }

    /// Returns as soon as the submission is queued; the verdict arrives later.
    ///
    /// Queue capacity is reserved before anything is written, so a refused submission
    /// leaves no record behind.
    pub async fn submit(&self, new: NewSubmission) -> Result<Submission, SubmitError> {
        let slot = self.pool.reserve()?;
        let submission = self.store.insert_submission(new).await?;
        slot.send(submission.id);

        info!(
            submission_id = submission.id,
            user_id = submission.user_id,
            problem_id = submission.problem_id,
            language = %submission.language,
            "Submission queued"
        );
        Ok(submission)
    }

    /// Stop taking submissions and wait for queued ones to finish judging.
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }
}
