pub mod config;
pub mod entity;
pub mod event;
pub mod judge_outcome;
pub mod notify;
pub mod storage;
pub mod submission_status;

pub use judge_outcome::JudgeOutcome;
pub use notify::{LogPublisher, MemoryPublisher, NotifyError, Publisher};
pub use storage::{EntityStore, MemoryStore, StorageError};
pub use submission_status::{SubmissionStatus, Verdict};
