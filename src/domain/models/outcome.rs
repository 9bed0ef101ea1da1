use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result of a single delivery attempt, as classified by a channel client.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Success,
    TransientFailure { reason: String },
    RateLimited { retry_after: Duration },
    PermanentFailure { reason: String },
}

impl DeliveryOutcome {
    pub fn transient(reason: impl Into<String>) -> Self {
        DeliveryOutcome::TransientFailure {
            reason: reason.into(),
        }
    }

    pub fn permanent(reason: impl Into<String>) -> Self {
        DeliveryOutcome::PermanentFailure {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            DeliveryOutcome::Success => OutcomeKind::Delivered,
            DeliveryOutcome::TransientFailure { .. } => OutcomeKind::TransientFailure,
            DeliveryOutcome::RateLimited { .. } => OutcomeKind::RateLimited,
            DeliveryOutcome::PermanentFailure { .. } => OutcomeKind::PermanentFailure,
        }
    }

    /// Diagnostic text for failed attempts, `None` on success.
    pub fn detail(&self) -> Option<String> {
        match self {
            DeliveryOutcome::Success => None,
            DeliveryOutcome::TransientFailure { reason } => Some(reason.clone()),
            DeliveryOutcome::RateLimited { retry_after } => Some(format!(
                "rate limited, retry after {:.3}s",
                retry_after.as_secs_f64()
            )),
            DeliveryOutcome::PermanentFailure { reason } => Some(reason.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Delivered,
    TransientFailure,
    RateLimited,
    PermanentFailure,
}
