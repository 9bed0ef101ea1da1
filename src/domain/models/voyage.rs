use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoyageOutcome {
    Returned,
    Failed,
}

impl VoyageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoyageOutcome::Returned => "returned",
            VoyageOutcome::Failed => "failed",
        }
    }
}

impl fmt::Display for VoyageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submarine voyage that reached its arrival time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageEvent {
    pub character: String,
    pub world: String,
    pub submarine: String,
    pub voyage_id: String,
    pub arrival_at: DateTime<Utc>,
    pub outcome: VoyageOutcome,
}

impl VoyageEvent {
    pub fn character_label(&self) -> String {
        format!("{}@{}", self.character, self.world)
    }

    /// Stable per voyage and outcome, so repeated polls of the same arrival
    /// collapse onto one queue entry.
    pub fn identity(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.character_label(),
            self.submarine,
            self.voyage_id,
            self.outcome
        )
    }
}
