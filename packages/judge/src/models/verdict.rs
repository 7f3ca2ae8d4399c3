use common::{JudgeOutcome, Verdict};

use super::sandbox::RunFailure;

/// Longest program output or error text kept on a submission, in bytes.
pub const MAX_STORED_TEXT: usize = 64 * 1024;

const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Why evaluation stopped before exhausting the test cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Failed(RunFailure),
    Mismatch { expected: String, actual: String },
}

impl StopReason {
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Failed(RunFailure::CompileTimeout | RunFailure::CompileError { .. }) => {
                Verdict::CompilationError
            }
            Self::Failed(RunFailure::ExecutionTimeout) => Verdict::TimeLimitExceeded,
            Self::Failed(RunFailure::RuntimeError { .. }) => Verdict::RuntimeError,
            Self::Mismatch { .. } => Verdict::WrongAnswer,
        }
    }
}

/// Map how evaluation ended to its verdict. No stop means every case matched.
pub fn resolve(stop: Option<&StopReason>) -> Verdict {
    stop.map_or(Verdict::Accepted, StopReason::verdict)
}

/// Fold the end of an evaluation into a [`JudgeOutcome`].
pub fn outcome(
    stop: Option<StopReason>,
    total_tests: usize,
    passed_tests: usize,
    time_used: Option<i32>,
) -> JudgeOutcome {
    let verdict = resolve(stop.as_ref());
    let (output, expected_output, error) = match stop {
        None => (None, None, None),
        Some(StopReason::Mismatch { expected, actual }) => (Some(actual), Some(expected), None),
        Some(StopReason::Failed(RunFailure::CompileError { stderr })) => (None, None, Some(stderr)),
        Some(StopReason::Failed(RunFailure::RuntimeError { message })) => {
            (None, None, Some(message))
        }
        Some(StopReason::Failed(failure)) => (None, None, Some(failure.to_string())),
    };

    JudgeOutcome {
        verdict,
        output: output.map(clip),
        expected_output,
        error: error.map(clip),
        total_tests,
        passed_tests,
        time_used,
    }
}

/// Cut `text` to at most [`MAX_STORED_TEXT`] bytes on a char boundary, marking the cut.
fn clip(mut text: String) -> String {
    if text.len() <= MAX_STORED_TEXT {
        return text;
    }
    let mut end = MAX_STORED_TEXT - TRUNCATION_MARKER.len();
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str(TRUNCATION_MARKER);
    text
}
