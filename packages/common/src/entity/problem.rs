use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Problem aggregate. `solved_count` is mutated when a submission is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i32,
    pub contest_id: i32,
    pub title: String,
    pub difficulty: Difficulty,
    /// Reward added to a user's score on acceptance.
    pub points: i32,
    pub solved_count: i32,
    pub attempt_count: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProblem {
    pub contest_id: i32,
    pub title: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    100
}
