use std::sync::Arc;

use common::{EntityStore, StorageError, SubmissionStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// Whether an accepted resubmission of an already solved problem earns points again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmissionPolicy {
    /// Every accepted submission is credited.
    #[default]
    EveryAcceptance,
    /// Only the first acceptance per (user, problem) is credited.
    FirstAcceptance,
}

/// What [`ScoreUpdater::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEffect {
    Awarded { points: i32, user_score: i64 },
    /// The user had already solved the problem and the policy forbids re-crediting.
    AlreadySolved,
    /// Effects of this submission were applied before.
    AlreadyScored,
    NotAccepted,
}

/// Applies the side effects of an acceptance to the problem and user aggregates.
///
/// All updates go through one lock, so concurrent acceptances never lose increments and
/// a submission is credited at most once. The problem, user, and submission saves are
/// separate store calls and are not atomic as a group.
pub struct ScoreUpdater {
    store: Arc<dyn EntityStore>,
    policy: ResubmissionPolicy,
    lock: Mutex<()>,
}

impl ScoreUpdater {
    pub fn new(store: Arc<dyn EntityStore>, policy: ResubmissionPolicy) -> Self {
        Self {
            store,
            policy,
            lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> ResubmissionPolicy {
        self.policy
    }

    pub async fn apply(&self, submission_id: i32) -> Result<ScoreEffect, StorageError> {
        let _guard = self.lock.lock().await;

        let mut submission = self.store.submission(submission_id).await?;
        if submission.status != SubmissionStatus::Accepted {
            return Ok(ScoreEffect::NotAccepted);
        }
        if submission.scored {
            return Ok(ScoreEffect::AlreadyScored);
        }

        let mut problem = self.store.problem(submission.problem_id).await?;
        let mut user = self.store.user(submission.user_id).await?;

        let first_solve = !user.solved_problems.contains(&problem.id);
        let effect = if first_solve || self.policy == ResubmissionPolicy::EveryAcceptance {
            problem.solved_count += 1;
            user.score += i64::from(problem.points);
            user.problems_solved += 1;
            user.solved_problems.insert(problem.id);

            self.store.save_problem(problem.clone()).await?;
            let user = self.store.save_user(user).await?;

            info!(
                submission_id,
                user_id = user.id,
                problem_id = problem.id,
                points = problem.points,
                score = user.score,
                "Score awarded"
            );
            ScoreEffect::Awarded {
                points: problem.points,
                user_score: user.score,
            }
        } else {
            info!(
                submission_id,
                user_id = user.id,
                problem_id = problem.id,
                "Problem already solved, no points awarded"
            );
            ScoreEffect::AlreadySolved
        };

        submission.scored = true;
        self.store.save_submission(submission).await?;
        Ok(effect)
    }
}
