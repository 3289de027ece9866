//! Server-side asynchronous jobs

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Job status. Parses both the v2 (`queued`, `running`, `finished`,
/// `failed`) and the v3 (`PROCESSING`, `COMPLETE`, `FAILED`) spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Running,
    Finished,
    Failed,
}

impl_domain_status_conversions!(JobState {
    Queued => "queued",
    Running => "running" | "PROCESSING" | "POLLING",
    Finished => "finished" | "COMPLETE",
    Failed => "failed",
});

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub guid: String,
    pub state: JobState,
    /// Server-supplied failure description.
    pub error: Option<String>,
}

impl Job {
    pub fn new(guid: impl Into<String>, state: JobState) -> Self {
        Self { guid: guid.into(), state, error: None }
    }

    pub fn is_finished(&self) -> bool {
        self.state == JobState::Finished
    }

    pub fn is_failed(&self) -> bool {
        self.state == JobState::Failed
    }
}
