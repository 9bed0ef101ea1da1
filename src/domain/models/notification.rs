use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::channel::ChannelId;
use super::outcome::{DeliveryOutcome, OutcomeKind};
use super::payload::NotificationPayload;
use crate::domain::value_objects::RetryPolicy;

/// Per-item attempt log is bounded; older entries are dropped first.
pub const MAX_ATTEMPT_LOG: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Pending,
    InFlight,
    DeadLettered,
}

/// What a formatter hands over for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub hash_key: String,
    pub target: ChannelId,
    pub label: String,
    pub payload: NotificationPayload,
    pub event_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub id: Uuid,
    pub attempt_number: u32,
    pub attempted_at: DateTime<Utc>,
    pub outcome: OutcomeKind,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationWorkItem {
    pub hash_key: String,
    pub target: ChannelId,
    pub label: String,
    pub payload: NotificationPayload,
    pub event_timestamp: DateTime<Utc>,
    pub attempt_count: u32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub status: WorkItemStatus,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attempts: Vec<DeliveryAttempt>,
}

/// Where an item went after an outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Delivered,
    Rescheduled { next_attempt_at: DateTime<Utc> },
    DeadLettered,
}

impl NotificationWorkItem {
    pub fn new(notification: NewNotification, now: DateTime<Utc>) -> Self {
        Self {
            hash_key: notification.hash_key,
            target: notification.target,
            label: notification.label,
            payload: notification.payload,
            event_timestamp: notification.event_timestamp,
            attempt_count: 0,
            next_attempt_at: now,
            last_attempt_at: None,
            status: WorkItemStatus::Pending,
            last_error: None,
            created_at: now,
            updated_at: now,
            attempts: Vec::new(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == WorkItemStatus::Pending && self.next_attempt_at <= now
    }

    /// Pending and in-flight items block re-submission of the same key.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            WorkItemStatus::Pending | WorkItemStatus::InFlight
        )
    }

    /// Picks the item up for dispatch. Counts the attempt up front so the
    /// counter moves exactly once per dispatch, whatever the outcome.
    pub fn begin_attempt(&mut self, now: DateTime<Utc>) {
        self.status = WorkItemStatus::InFlight;
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.last_attempt_at = Some(now);
        self.updated_at = now;
    }

    pub fn apply_outcome(
        &mut self,
        outcome: &DeliveryOutcome,
        now: DateTime<Utc>,
        policy: &RetryPolicy,
    ) -> Transition {
        self.updated_at = now;
        self.log_attempt(outcome, now);

        let (provider_delay, eager_dead_letter) = match outcome {
            DeliveryOutcome::Success => return Transition::Delivered,
            DeliveryOutcome::TransientFailure { .. } => (None, false),
            DeliveryOutcome::RateLimited { retry_after } => (Some(*retry_after), false),
            DeliveryOutcome::PermanentFailure { .. } => {
                (None, policy.dead_letter_on_permanent_failure)
            }
        };

        self.last_error = outcome.detail();

        if eager_dead_letter || self.attempt_count >= policy.max_attempts {
            self.status = WorkItemStatus::DeadLettered;
            return Transition::DeadLettered;
        }

        self.status = WorkItemStatus::Pending;
        self.next_attempt_at =
            policy
                .backoff
                .next_attempt_at(now, self.attempt_count, provider_delay);
        Transition::Rescheduled {
            next_attempt_at: self.next_attempt_at,
        }
    }

    /// Operator requeue of a dead letter: a fresh attempt stream, due now.
    pub fn requeue(&mut self, now: DateTime<Utc>) {
        self.status = WorkItemStatus::Pending;
        self.attempt_count = 0;
        self.next_attempt_at = now;
        self.updated_at = now;
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_attempt_at
            .map_or(self.updated_at, |at| at.max(self.updated_at))
    }

    fn log_attempt(&mut self, outcome: &DeliveryOutcome, now: DateTime<Utc>) {
        if self.attempts.len() >= MAX_ATTEMPT_LOG {
            self.attempts.remove(0);
        }
        self.attempts.push(DeliveryAttempt {
            id: Uuid::new_v4(),
            attempt_number: self.attempt_count,
            attempted_at: now,
            outcome: outcome.kind(),
            detail: outcome.detail(),
        });
    }
}
