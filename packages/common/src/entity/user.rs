use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// User aggregate. Score fields are mutated when one of the user's submissions is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub score: i64,
    pub problems_solved: i32,
    /// Problems with at least one credited acceptance.
    #[serde(default)]
    pub solved_problems: BTreeSet<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}
