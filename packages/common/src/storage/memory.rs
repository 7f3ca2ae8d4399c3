use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::traits::EntityStore;
use crate::SubmissionStatus;
use crate::entity::{
    DEFAULT_LANGUAGE, NewProblem, NewSubmission, NewTestCase, NewUser, Problem, Submission,
    TestCase, User,
};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn get(&self, entity: &'static str, id: i32) -> Result<T, StorageError> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(entity, id))
    }

    fn replace(&mut self, entity: &'static str, id: i32, row: T) -> Result<T, StorageError> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(StorageError::not_found(entity, id)),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }
}

#[derive(Debug, Default)]
struct Tables {
    submissions: Table<Submission>,
    problems: Table<Problem>,
    users: Table<User>,
    test_cases: Table<TestCase>,
}

/// In-process [`EntityStore`] with sequential ids per entity type.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn submission(&self, id: i32) -> Result<Submission, StorageError> {
        self.tables.read().await.submissions.get("submission", id)
    }

    async fn problem(&self, id: i32) -> Result<Problem, StorageError> {
        self.tables.read().await.problems.get("problem", id)
    }

    async fn user(&self, id: i32) -> Result<User, StorageError> {
        self.tables.read().await.users.get("user", id)
    }

    async fn test_cases(&self, problem_id: i32) -> Result<Vec<TestCase>, StorageError> {
        let tables = self.tables.read().await;
        if !tables.problems.rows.contains_key(&problem_id) {
            return Err(StorageError::not_found("problem", problem_id));
        }
        // Ids are assigned in insertion order, so map order is creation order.
        Ok(tables
            .test_cases
            .rows
            .values()
            .filter(|tc| tc.problem_id == problem_id)
            .cloned()
            .collect())
    }

    async fn save_submission(&self, submission: Submission) -> Result<Submission, StorageError> {
        let id = submission.id;
        self.tables
            .write()
            .await
            .submissions
            .replace("submission", id, submission)
    }

    async fn save_problem(&self, problem: Problem) -> Result<Problem, StorageError> {
        let id = problem.id;
        self.tables.write().await.problems.replace("problem", id, problem)
    }

    async fn save_user(&self, user: User) -> Result<User, StorageError> {
        let id = user.id;
        self.tables.write().await.users.replace("user", id, user)
    }

    async fn insert_submission(&self, new: NewSubmission) -> Result<Submission, StorageError> {
        let mut tables = self.tables.write().await;
        tables.users.get("user", new.user_id)?;
        tables.problems.get("problem", new.problem_id)?;

        Ok(tables.submissions.insert_with(|id| Submission {
            id,
            user_id: new.user_id,
            problem_id: new.problem_id,
            contest_id: new.contest_id,
            code: new.code,
            language: new.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            status: SubmissionStatus::Pending,
            verdict: None,
            output: None,
            error: None,
            execution_time_ms: None,
            memory_used_kb: None,
            submitted_at: Utc::now(),
            scored: false,
        }))
    }

    async fn insert_problem(&self, new: NewProblem) -> Result<Problem, StorageError> {
        Ok(self.tables.write().await.problems.insert_with(|id| Problem {
            id,
            contest_id: new.contest_id,
            title: new.title,
            difficulty: new.difficulty,
            points: new.points,
            solved_count: 0,
            attempt_count: 0,
        }))
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StorageError> {
        Ok(self.tables.write().await.users.insert_with(|id| User {
            id,
            username: new.username,
            full_name: new.full_name,
            score: 0,
            problems_solved: 0,
            solved_problems: Default::default(),
        }))
    }

    async fn insert_test_case(&self, new: NewTestCase) -> Result<TestCase, StorageError> {
        let mut tables = self.tables.write().await;
        tables.problems.get("problem", new.problem_id)?;

        Ok(tables.test_cases.insert_with(|id| TestCase {
            id,
            problem_id: new.problem_id,
            input: new.input,
            expected_output: new.expected_output,
            is_hidden: new.is_hidden,
        }))
    }
}
