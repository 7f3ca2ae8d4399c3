pub mod problem;
pub mod submission;
pub mod test_case;
pub mod user;

pub use problem::{Difficulty, NewProblem, Problem};
pub use submission::{DEFAULT_LANGUAGE, NewSubmission, Submission, SubmissionView, TransitionError};
pub use test_case::{NewTestCase, TestCase};
pub use user::{NewUser, User};
