pub mod error;
pub mod process;
pub mod toolchain;
pub mod workspace;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use error::SandboxError;
pub use process::ProcessSandbox;
pub use toolchain::{Toolchain, Toolchains};
pub use workspace::Workspace;

/// Output of a program that ran to completion with a zero exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    /// Wall-clock time of the run stage only.
    pub elapsed: Duration,
}

/// Expected ways a single sandbox run can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    #[error("Compilation timeout")]
    CompileTimeout,

    #[error("Compilation error: {stderr}")]
    CompileError { stderr: String },

    #[error("Execution timeout")]
    ExecutionTimeout,

    #[error("{message}")]
    RuntimeError { message: String },
}

impl RunFailure {
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::RuntimeError {
            message: message.into(),
        }
    }
}

impl From<SandboxError> for RunFailure {
    fn from(err: SandboxError) -> Self {
        Self::runtime(err.to_string())
    }
}

/// Compiles and runs one program once, in a fresh workspace, under wall-clock bounds.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn run(&self, language: &str, source: &str, stdin: &str)
    -> Result<RunOutput, RunFailure>;
}
