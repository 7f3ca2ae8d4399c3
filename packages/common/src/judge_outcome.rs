use serde::{Deserialize, Serialize};

use crate::Verdict;

/// Result of evaluating one submission against a problem's test cases.
///
/// Transient: produced by the evaluator, folded into the submission record by the
/// coordinator, then dropped.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JudgeOutcome {
    pub verdict: Verdict,
    /// Actual output of the first mismatching test case (trimmed).
    pub output: Option<String>,
    /// Expected output of the first mismatching test case (trimmed).
    pub expected_output: Option<String>,
    /// Compiler diagnostics or runtime error text.
    pub error: Option<String>,
    pub total_tests: usize,
    /// Test cases that matched before evaluation stopped.
    pub passed_tests: usize,
    /// Maximum run-stage wall time across attempted test cases (milliseconds).
    pub time_used: Option<i32>,
}

impl JudgeOutcome {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}
