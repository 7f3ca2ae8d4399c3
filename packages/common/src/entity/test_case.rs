use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i32,
    pub problem_id: i32,
    pub input: String,
    pub expected_output: String,
    /// Hidden cases are stored but not exercised by the judge.
    pub is_hidden: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTestCase {
    pub problem_id: i32,
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
}
