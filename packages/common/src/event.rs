use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::entity::SubmissionView;

/// Topic naming for lifecycle notifications.
pub mod topics {
    pub fn submission(submission_id: i32) -> String {
        format!("submission/{submission_id}")
    }

    pub fn contest_submissions(contest_id: i32) -> String {
        format!("contest/{contest_id}/submissions")
    }

    pub fn leaderboard(contest_id: i32) -> String {
        format!("leaderboard/{contest_id}")
    }
}

/// Core event trait
pub trait Event: Send + Sync + Sized + Serialize + DeserializeOwned {
    /// Topic the event is published on (e.g., "submission/42")
    fn topic(&self) -> String;

    /// Convert event to a generic event
    fn to_generic_event(&self) -> GenericEvent {
        GenericEvent {
            topic: self.topic(),
            payload: serde_json::to_value(self).unwrap_or_default(),
        }
    }

    /// Create an event from a generic event
    fn from_generic_event(e: &GenericEvent) -> Result<Self, serde_json::Error> {
        serde_json::from_value(e.payload.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl Event for GenericEvent {
    fn topic(&self) -> String {
        self.topic.clone()
    }

    fn to_generic_event(&self) -> GenericEvent {
        self.clone()
    }

    fn from_generic_event(e: &GenericEvent) -> Result<Self, serde_json::Error> {
        Ok(e.clone())
    }
}

/// Submission state changed; published on `submission/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionUpdated(pub SubmissionView);

impl Event for SubmissionUpdated {
    fn topic(&self) -> String {
        topics::submission(self.0.id)
    }
}

/// Submission reached a terminal state; published on `contest/{id}/submissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestSubmission(pub SubmissionView);

impl Event for ContestSubmission {
    fn topic(&self) -> String {
        topics::contest_submissions(self.0.contest_id)
    }
}

/// An acceptance changed scores; subscribers re-pull the contest leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRefresh {
    pub contest_id: i32,
    pub user_id: i32,
    pub problem_id: i32,
    pub submission_id: i32,
}

impl Event for LeaderboardRefresh {
    fn topic(&self) -> String {
        topics::leaderboard(self.contest_id)
    }
}
