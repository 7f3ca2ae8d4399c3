use async_trait::async_trait;

use super::error::StorageError;
use crate::entity::{
    NewProblem, NewSubmission, NewTestCase, NewUser, Problem, Submission, TestCase, User,
};

/// Persistence boundary for the judging engine.
///
/// Reads return [`StorageError::NotFound`] for unknown ids; saves replace the stored
/// record with the given one and return what was stored.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn submission(&self, id: i32) -> Result<Submission, StorageError>;

    async fn problem(&self, id: i32) -> Result<Problem, StorageError>;

    async fn user(&self, id: i32) -> Result<User, StorageError>;

    /// All test cases of a problem, in creation order.
    async fn test_cases(&self, problem_id: i32) -> Result<Vec<TestCase>, StorageError>;

    async fn save_submission(&self, submission: Submission) -> Result<Submission, StorageError>;

    async fn save_problem(&self, problem: Problem) -> Result<Problem, StorageError>;

    async fn save_user(&self, user: User) -> Result<User, StorageError>;

    /// Persist a new submission in `PENDING` state.
    async fn insert_submission(&self, new: NewSubmission) -> Result<Submission, StorageError>;

    async fn insert_problem(&self, new: NewProblem) -> Result<Problem, StorageError>;

    async fn insert_user(&self, new: NewUser) -> Result<User, StorageError>;

    async fn insert_test_case(&self, new: NewTestCase) -> Result<TestCase, StorageError>;
}
