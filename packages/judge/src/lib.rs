pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod problem_file;

pub use config::{JudgeAppConfig, SandboxConfig, ScoringConfig, WorkerConfig};
pub use error::{JudgeError, PoolError, Result, SubmitError};
pub use handlers::judge::JudgeCoordinator;
pub use handlers::submit::SubmissionService;
pub use models::{
    Evaluator, JudgePool, ProcessSandbox, ResubmissionPolicy, RunFailure, RunOutput, Sandbox,
    ScoreUpdater, Toolchain, Toolchains,
};
pub use problem_file::ProblemFile;
