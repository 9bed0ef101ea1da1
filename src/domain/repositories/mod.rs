use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{DeliveryOutcome, NotificationWorkItem, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub pending: usize,
    pub in_flight: usize,
    pub dead_lettered: usize,
}

/// Work-item store keyed by hash key. Every method is atomic with respect
/// to a given key.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Returns `false` when a pending or in-flight item already holds the key.
    /// A dead-lettered item with the same key is replaced.
    async fn enqueue(&self, item: NotificationWorkItem) -> anyhow::Result<bool>;

    /// Due items, oldest-due first, already marked in-flight.
    async fn due_items(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<NotificationWorkItem>>;

    /// `None` when the key is unknown or the item is not in flight.
    async fn record_outcome(
        &self,
        hash_key: &str,
        outcome: DeliveryOutcome,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Transition>>;

    /// Pending and in-flight items sorted by next attempt, ascending.
    async fn pending(&self) -> anyhow::Result<Vec<NotificationWorkItem>>;

    /// Dead letters, most recent activity first.
    async fn dead_letters(&self) -> anyhow::Result<Vec<NotificationWorkItem>>;

    async fn try_requeue_dead_letter(
        &self,
        hash_key: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    async fn get(&self, hash_key: &str) -> anyhow::Result<Option<NotificationWorkItem>>;

    async fn stats(&self) -> anyhow::Result<QueueStats>;
}
