use std::sync::Arc;

use common::JudgeOutcome;
use common::entity::TestCase;
use tracing::{debug, warn};

use super::sandbox::Sandbox;
use super::verdict::{self, StopReason};

/// Runs a program against test cases in order and stops at the first failure.
pub struct Evaluator {
    sandbox: Arc<dyn Sandbox>,
}

impl Evaluator {
    pub fn new(sandbox: Arc<dyn Sandbox>) -> Self {
        Self { sandbox }
    }

    pub async fn evaluate(
        &self,
        test_cases: &[TestCase],
        code: &str,
        language: &str,
    ) -> JudgeOutcome {
        let total = test_cases.len();
        if total == 0 {
            warn!(language, "No test cases to judge against, accepting vacuously");
        }

        let mut passed = 0;
        let mut time_used: Option<i32> = None;
        let mut stop = None;

        for (index, test_case) in test_cases.iter().enumerate() {
            match self.sandbox.run(language, code, &test_case.input).await {
                Ok(run) => {
                    let millis = i32::try_from(run.elapsed.as_millis()).unwrap_or(i32::MAX);
                    time_used = Some(time_used.map_or(millis, |t| t.max(millis)));

                    if outputs_match(&test_case.expected_output, &run.stdout) {
                        passed += 1;
                        continue;
                    }
                    debug!(test_case_id = test_case.id, index, "Output mismatch");
                    stop = Some(StopReason::Mismatch {
                        expected: test_case.expected_output.trim().to_string(),
                        actual: run.stdout.trim().to_string(),
                    });
                }
                Err(failure) => {
                    debug!(test_case_id = test_case.id, index, %failure, "Run failed");
                    stop = Some(StopReason::Failed(failure));
                }
            }
            break;
        }

        verdict::outcome(stop, total, passed, time_used)
    }
}

/// Outputs match when they are equal after trimming surrounding whitespace.
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    expected.trim() == actual.trim()
}
