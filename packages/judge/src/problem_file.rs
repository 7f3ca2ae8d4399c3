use common::entity::{Difficulty, NewProblem, NewTestCase, Problem};
use common::{EntityStore, StorageError};
use serde::Deserialize;

/// A problem and its test cases described in TOML.
///
/// ```toml
/// title = "A + B"
/// points = 100
///
/// [[test_cases]]
/// input = "3 5\n"
/// expected_output = "8"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemFile {
    pub title: String,
    #[serde(default = "default_contest_id")]
    pub contest_id: i32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(default)]
    pub test_cases: Vec<ProblemFileCase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemFileCase {
    #[serde(default)]
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub hidden: bool,
}

fn default_contest_id() -> i32 {
    1
}

fn default_points() -> i32 {
    100
}

impl ProblemFile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Insert the problem and its test cases, in file order.
    pub async fn seed(&self, store: &dyn EntityStore) -> Result<Problem, StorageError> {
        let problem = store
            .insert_problem(NewProblem {
                contest_id: self.contest_id,
                title: self.title.clone(),
                difficulty: self.difficulty,
                points: self.points,
            })
            .await?;

        for case in &self.test_cases {
            store
                .insert_test_case(NewTestCase {
                    problem_id: problem.id,
                    input: case.input.clone(),
                    expected_output: case.expected_output.clone(),
                    is_hidden: case.hidden,
                })
                .await?;
        }
        Ok(problem)
    }
}
