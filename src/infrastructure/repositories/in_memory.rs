use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    models::{DeliveryOutcome, NotificationWorkItem, Transition, WorkItemStatus},
    repositories::{NotificationQueue, QueueStats},
    value_objects::RetryPolicy,
};

/// Process-lifetime queue. A single lock covers the whole map, which keeps
/// every per-key transition atomic.
#[derive(Default)]
pub struct InMemoryNotificationQueue {
    items: Arc<RwLock<HashMap<String, NotificationWorkItem>>>,
    policy: RetryPolicy,
}

impl InMemoryNotificationQueue {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            items: Arc::default(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl NotificationQueue for InMemoryNotificationQueue {
    async fn enqueue(&self, item: NotificationWorkItem) -> anyhow::Result<bool> {
        let mut items = self.items.write().await;
        match items.entry(item.hash_key.clone()) {
            Entry::Occupied(existing) if existing.get().is_active() => {
                tracing::debug!(hash_key = %item.hash_key, "Notification already queued");
                Ok(false)
            }
            Entry::Occupied(mut existing) => {
                tracing::info!(
                    hash_key = %item.hash_key,
                    "Re-submission replaces dead letter"
                );
                existing.insert(item);
                Ok(true)
            }
            Entry::Vacant(slot) => {
                tracing::debug!(
                    hash_key = %item.hash_key,
                    target = %item.target,
                    "Notification queued"
                );
                slot.insert(item);
                Ok(true)
            }
        }
    }

    async fn due_items(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<NotificationWorkItem>> {
        let mut items = self.items.write().await;
        let mut due: Vec<&mut NotificationWorkItem> =
            items.values_mut().filter(|item| item.is_due(now)).collect();
        due.sort_by(|a, b| {
            a.next_attempt_at
                .cmp(&b.next_attempt_at)
                .then_with(|| a.hash_key.cmp(&b.hash_key))
        });

        Ok(due
            .into_iter()
            .map(|item| {
                item.begin_attempt(now);
                item.clone()
            })
            .collect())
    }

    async fn record_outcome(
        &self,
        hash_key: &str,
        outcome: DeliveryOutcome,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Transition>> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(hash_key) else {
            tracing::warn!(hash_key, "Outcome for unknown notification ignored");
            return Ok(None);
        };
        if item.status != WorkItemStatus::InFlight {
            tracing::warn!(
                hash_key,
                status = ?item.status,
                "Outcome for notification that is not in flight ignored"
            );
            return Ok(None);
        }

        let transition = item.apply_outcome(&outcome, now, &self.policy);
        match transition {
            Transition::Delivered => {
                items.remove(hash_key);
                tracing::info!(hash_key, "Notification delivered");
            }
            Transition::Rescheduled { next_attempt_at } => {
                tracing::info!(
                    hash_key,
                    attempt = item.attempt_count,
                    next_attempt_at = %next_attempt_at,
                    error = item.last_error.as_deref().unwrap_or_default(),
                    "Notification delivery rescheduled"
                );
            }
            Transition::DeadLettered => {
                tracing::warn!(
                    hash_key,
                    attempt = item.attempt_count,
                    error = item.last_error.as_deref().unwrap_or_default(),
                    "Notification dead-lettered"
                );
            }
        }

        Ok(Some(transition))
    }

    async fn pending(&self) -> anyhow::Result<Vec<NotificationWorkItem>> {
        let items = self.items.read().await;
        let mut pending: Vec<_> = items
            .values()
            .filter(|item| item.is_active())
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            a.next_attempt_at
                .cmp(&b.next_attempt_at)
                .then_with(|| a.hash_key.cmp(&b.hash_key))
        });
        Ok(pending)
    }

    async fn dead_letters(&self) -> anyhow::Result<Vec<NotificationWorkItem>> {
        let items = self.items.read().await;
        let mut dead: Vec<_> = items
            .values()
            .filter(|item| item.status == WorkItemStatus::DeadLettered)
            .cloned()
            .collect();
        dead.sort_by(|a, b| {
            b.last_activity()
                .cmp(&a.last_activity())
                .then_with(|| a.hash_key.cmp(&b.hash_key))
        });
        Ok(dead)
    }

    async fn try_requeue_dead_letter(
        &self,
        hash_key: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let mut items = self.items.write().await;
        match items.get_mut(hash_key) {
            Some(item) if item.status == WorkItemStatus::DeadLettered => {
                item.requeue(now);
                tracing::info!(hash_key, "Dead letter requeued");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, hash_key: &str) -> anyhow::Result<Option<NotificationWorkItem>> {
        let items = self.items.read().await;
        Ok(items.get(hash_key).cloned())
    }

    async fn stats(&self) -> anyhow::Result<QueueStats> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .fold(QueueStats::default(), |mut stats, item| {
                match item.status {
                    WorkItemStatus::Pending => stats.pending += 1,
                    WorkItemStatus::InFlight => stats.in_flight += 1,
                    WorkItemStatus::DeadLettered => stats.dead_lettered += 1,
                }
                stats
            }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::models::{ChannelId, ChatEmbed, NewNotification, NotificationPayload};

    fn make_item(hash_key: &str, now: DateTime<Utc>) -> NotificationWorkItem {
        NotificationWorkItem::new(
            NewNotification {
                hash_key: hash_key.to_string(),
                target: ChannelId::ChatWebhook,
                label: "Alice@Ravana".to_string(),
                payload: NotificationPayload::ChatEmbed(ChatEmbed {
                    title: "Submarine returned".to_string(),
                    description: "Back home".to_string(),
                    color_hex: Some("#2ECC71".to_string()),
                    fields: vec![],
                    footer: None,
                }),
                event_timestamp: now,
            },
            now,
        )
    }

    async fn dead_letter(queue: &InMemoryNotificationQueue, hash_key: &str, now: DateTime<Utc>) {
        for n in 0..queue.policy().max_attempts {
            let at = now + chrono::Duration::hours(i64::from(n));
            let due = queue.due_items(at).await.unwrap();
            assert_eq!(due.len(), 1);
            queue
                .record_outcome(hash_key, DeliveryOutcome::transient("down"), at)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_enqueue_is_idempotent_per_key() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();

        assert!(queue.enqueue(make_item("sub-42-v7", now)).await.unwrap());
        assert!(!queue.enqueue(make_item("sub-42-v7", now)).await.unwrap());

        queue.due_items(now).await.unwrap();
        assert!(!queue.enqueue(make_item("sub-42-v7", now)).await.unwrap());

        assert_eq!(queue.pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enqueue_replaces_dead_letter() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();
        dead_letter(&queue, "k", now).await;
        assert_eq!(queue.dead_letters().await.unwrap().len(), 1);

        assert!(queue.enqueue(make_item("k", now)).await.unwrap());

        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.dead_lettered, 0);
        assert_eq!(stats.pending, 1);
        let item = queue.get("k").await.unwrap().unwrap();
        assert_eq!(item.attempt_count, 0);
    }

    #[tokio::test]
    async fn test_due_items_oldest_first_and_marked_in_flight() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue
            .enqueue(make_item("late", now - chrono::Duration::seconds(1)))
            .await
            .unwrap();
        queue
            .enqueue(make_item("early", now - chrono::Duration::seconds(30)))
            .await
            .unwrap();
        queue
            .enqueue(make_item("future", now + chrono::Duration::seconds(30)))
            .await
            .unwrap();

        let due = queue.due_items(now).await.unwrap();
        let keys: Vec<_> = due.iter().map(|item| item.hash_key.as_str()).collect();
        assert_eq!(keys, vec!["early", "late"]);
        assert!(due.iter().all(|item| item.status == WorkItemStatus::InFlight));

        assert!(queue.due_items(now).await.unwrap().is_empty());
        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.in_flight, 2);
        assert_eq!(stats.pending, 1);
    }

    #[tokio::test]
    async fn test_success_removes_item() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();
        queue.due_items(now).await.unwrap();

        let transition = queue
            .record_outcome("k", DeliveryOutcome::Success, now)
            .await
            .unwrap();

        assert_eq!(transition, Some(Transition::Delivered));
        assert!(queue.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consecutive_transient_failures_stay_pending() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();

        let mut previous = now;
        let mut clock = now;
        for n in 1..queue.policy().max_attempts {
            let due = queue.due_items(clock).await.unwrap();
            assert_eq!(due.len(), 1);
            queue
                .record_outcome("k", DeliveryOutcome::transient("timeout"), clock)
                .await
                .unwrap();

            let item = queue.get("k").await.unwrap().unwrap();
            assert_eq!(item.attempt_count, n);
            assert_eq!(item.status, WorkItemStatus::Pending);
            assert!(item.next_attempt_at >= previous);
            previous = item.next_attempt_at;
            clock = item.next_attempt_at;
        }
    }

    #[tokio::test]
    async fn test_ceiling_dead_letters() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();

        dead_letter(&queue, "k", now).await;

        let item = queue.get("k").await.unwrap().unwrap();
        assert_eq!(item.status, WorkItemStatus::DeadLettered);
        assert_eq!(item.attempt_count, 5);
        assert!(queue.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_uses_provider_delay() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();
        queue.due_items(now).await.unwrap();

        queue
            .record_outcome(
                "k",
                DeliveryOutcome::RateLimited {
                    retry_after: Duration::from_secs(5),
                },
                now,
            )
            .await
            .unwrap();

        let item = queue.get("k").await.unwrap().unwrap();
        assert_eq!(item.status, WorkItemStatus::Pending);
        assert_eq!(item.attempt_count, 1);
        assert_eq!(item.next_attempt_at, now + chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_outcome_for_unknown_or_idle_item_is_ignored() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        assert_eq!(
            queue
                .record_outcome("missing", DeliveryOutcome::Success, now)
                .await
                .unwrap(),
            None
        );

        queue.enqueue(make_item("k", now)).await.unwrap();
        assert_eq!(
            queue
                .record_outcome("k", DeliveryOutcome::Success, now)
                .await
                .unwrap(),
            None
        );
        assert!(queue.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_requeue_dead_letter() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("k", now)).await.unwrap();
        dead_letter(&queue, "k", now).await;

        let later = now + chrono::Duration::days(1);
        assert!(queue.try_requeue_dead_letter("k", later).await.unwrap());

        let item = queue.get("k").await.unwrap().unwrap();
        assert_eq!(item.status, WorkItemStatus::Pending);
        assert_eq!(item.attempt_count, 0);
        assert_eq!(queue.due_items(later).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_requeue_missing_or_pending_key_is_noop() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        assert!(!queue.try_requeue_dead_letter("missing", now).await.unwrap());

        queue.enqueue(make_item("k", now)).await.unwrap();
        assert!(!queue.try_requeue_dead_letter("k", now).await.unwrap());
        assert_eq!(queue.stats().await.unwrap().pending, 1);
    }

    #[tokio::test]
    async fn test_dead_letters_newest_first() {
        let queue = InMemoryNotificationQueue::default();
        let now = Utc::now();
        queue.enqueue(make_item("old", now)).await.unwrap();
        dead_letter(&queue, "old", now).await;

        let later = now + chrono::Duration::days(1);
        queue.enqueue(make_item("new", later)).await.unwrap();
        dead_letter(&queue, "new", later).await;

        let keys: Vec<_> = queue
            .dead_letters()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.hash_key)
            .collect();
        assert_eq!(keys, vec!["new", "old"]);
    }
}
