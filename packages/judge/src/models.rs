pub mod evaluator;
pub mod pool;
pub mod sandbox;
pub mod scoring;
pub mod verdict;

pub use evaluator::{Evaluator, outputs_match};
pub use pool::{JudgePool, QueueSlot};
pub use sandbox::{ProcessSandbox, RunFailure, RunOutput, Sandbox, Toolchain, Toolchains};
pub use scoring::{ResubmissionPolicy, ScoreEffect, ScoreUpdater};
