use std::io;

use thiserror::Error;

/// Unexpected faults while preparing or driving a subprocess.
///
/// These never escape the sandbox as errors: they are reported to callers as
/// [`RunFailure::RuntimeError`](super::RunFailure::RuntimeError).
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Workspace setup failed: {0}")]
    Workspace(io::Error),

    #[error("Toolchain command is empty")]
    EmptyCommand,

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Subprocess IO error: {0}")]
    Io(#[from] io::Error),

    /// Stdout or stderr yielded more than the configured byte cap.
    #[error("Output limit exceeded")]
    OutputLimit { limit: u64 },
}
