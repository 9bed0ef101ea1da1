use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{sync::Semaphore, task::JoinSet, time::Instant};

use crate::{
    application::services::channel::{ChannelClient, ChannelGateway, Delivery},
    domain::{
        models::{DeliveryOutcome, NotificationWorkItem, Transition},
        repositories::NotificationQueue,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Upper bound on simultaneous outbound requests within one tick.
    pub max_concurrency: usize,
    pub attempt_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            attempt_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub dispatched: usize,
    pub delivered: usize,
    pub rescheduled: usize,
    pub dead_lettered: usize,
}

impl TickSummary {
    fn count(&mut self, transition: Transition) {
        match transition {
            Transition::Delivered => self.delivered += 1,
            Transition::Rescheduled { .. } => self.rescheduled += 1,
            Transition::DeadLettered => self.dead_lettered += 1,
        }
    }
}

/// Drives the queue. Holds no timer: an external driver calls [`tick`].
///
/// [`tick`]: NotificationDispatcher::tick
pub struct NotificationDispatcher {
    queue: Arc<dyn NotificationQueue>,
    gateway: ChannelGateway,
    config: DispatchConfig,
}

impl NotificationDispatcher {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        gateway: ChannelGateway,
        config: DispatchConfig,
    ) -> Self {
        Self {
            queue,
            gateway,
            config,
        }
    }

    /// Dispatches every item due at `now` and records each outcome. Every
    /// item picked up here has left the in-flight state when this returns.
    ///
    /// The round runs as its own task: dropping the returned future does not
    /// abandon items that were already marked in flight.
    pub async fn tick(&self, now: DateTime<Utc>) -> anyhow::Result<TickSummary> {
        let round = DispatchRound {
            queue: self.queue.clone(),
            gateway: self.gateway.clone(),
            config: self.config,
        };
        tokio::spawn(round.run(now)).await?
    }
}

struct DispatchRound {
    queue: Arc<dyn NotificationQueue>,
    gateway: ChannelGateway,
    config: DispatchConfig,
}

impl DispatchRound {
    async fn run(self, now: DateTime<Utc>) -> anyhow::Result<TickSummary> {
        let due = self.queue.due_items(now).await?;
        if due.is_empty() {
            return Ok(TickSummary::default());
        }

        let started = Instant::now();
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        let mut keys = HashMap::with_capacity(due.len());
        let mut summary = TickSummary {
            dispatched: due.len(),
            ..TickSummary::default()
        };

        for item in due {
            let client = self.gateway.get(item.target);
            let permits = permits.clone();
            let timeout = self.config.attempt_timeout;
            let hash_key = item.hash_key.clone();

            let handle = tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                attempt(client, item, timeout).await
            });
            keys.insert(handle.id(), hash_key);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(error = %err, "Dispatch task aborted");
                    let outcome =
                        DeliveryOutcome::transient(format!("dispatch task failed: {err}"));
                    (err.id(), outcome)
                }
            };
            let Some(hash_key) = keys.remove(&id) else {
                continue;
            };

            let recorded_at = chrono::Duration::from_std(started.elapsed())
                .ok()
                .and_then(|elapsed| now.checked_add_signed(elapsed))
                .unwrap_or(now);

            match self
                .queue
                .record_outcome(&hash_key, outcome, recorded_at)
                .await
            {
                Ok(Some(transition)) => summary.count(transition),
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(hash_key = %hash_key, error = %err, "Failed to record outcome");
                }
            }
        }

        tracing::info!(
            dispatched = summary.dispatched,
            delivered = summary.delivered,
            rescheduled = summary.rescheduled,
            dead_lettered = summary.dead_lettered,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dispatch tick finished"
        );

        Ok(summary)
    }
}

async fn attempt(
    client: Option<Arc<dyn ChannelClient>>,
    item: NotificationWorkItem,
    timeout: Duration,
) -> DeliveryOutcome {
    let Some(client) = client else {
        return DeliveryOutcome::transient(format!("no client registered for {}", item.target));
    };

    let delivery = Delivery {
        hash_key: &item.hash_key,
        label: &item.label,
        payload: &item.payload,
        event_timestamp: item.event_timestamp,
    };

    match tokio::time::timeout(timeout, client.send(delivery)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            tracing::warn!(
                hash_key = %item.hash_key,
                target = %item.target,
                error = %err,
                "Channel rejected notification"
            );
            DeliveryOutcome::transient(format!("channel error: {err}"))
        }
        Err(_) => DeliveryOutcome::transient(format!(
            "attempt timed out after {:.1}s",
            timeout.as_secs_f64()
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        application::services::channel::ChannelError,
        domain::models::{
            ChannelId, ChatEmbed, NewNotification, NotificationPayload, OutcomeKind,
            WorkItemStatus,
        },
        infrastructure::repositories::in_memory::InMemoryNotificationQueue,
    };

    enum Behavior {
        Respond(DeliveryOutcome),
        Fail,
        Hang,
        Panic,
    }

    struct ScriptedClient {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChannelClient for ScriptedClient {
        fn channel(&self) -> ChannelId {
            ChannelId::ChatWebhook
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn send(&self, _delivery: Delivery<'_>) -> Result<DeliveryOutcome, ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Respond(outcome) => Ok(outcome.clone()),
                Behavior::Fail => Err(ChannelError::PayloadMismatch {
                    channel: ChannelId::ChatWebhook,
                    payload: ChannelId::AutomationWebhook,
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(DeliveryOutcome::Success)
                }
                Behavior::Panic => panic!("client exploded"),
            }
        }
    }

    fn item(hash_key: &str, target: ChannelId, now: DateTime<Utc>) -> NotificationWorkItem {
        NotificationWorkItem::new(
            NewNotification {
                hash_key: hash_key.to_string(),
                target,
                label: "Alice".to_string(),
                payload: NotificationPayload::ChatEmbed(ChatEmbed {
                    title: "t".to_string(),
                    description: "d".to_string(),
                    color_hex: None,
                    fields: vec![],
                    footer: None,
                }),
                event_timestamp: now,
            },
            now,
        )
    }

    fn setup(
        client: Arc<ScriptedClient>,
        config: DispatchConfig,
    ) -> (Arc<InMemoryNotificationQueue>, NotificationDispatcher) {
        let queue = Arc::new(InMemoryNotificationQueue::default());
        let gateway = ChannelGateway::new(vec![client as Arc<dyn ChannelClient>]);
        let dispatcher = NotificationDispatcher::new(queue.clone(), gateway, config);
        (queue, dispatcher)
    }

    #[tokio::test]
    async fn test_tick_delivers_due_items() {
        let client = ScriptedClient::new(Behavior::Respond(DeliveryOutcome::Success));
        let (queue, dispatcher) = setup(client.clone(), DispatchConfig::default());
        let now = Utc::now();
        queue.enqueue(item("a", ChannelId::ChatWebhook, now)).await.unwrap();
        queue.enqueue(item("b", ChannelId::ChatWebhook, now)).await.unwrap();

        let summary = dispatcher.tick(now).await.unwrap();

        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.delivered, 2);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
        assert_eq!(queue.stats().await.unwrap(), Default::default());
    }

    #[tokio::test]
    async fn test_tick_without_due_items_is_noop() {
        let client = ScriptedClient::new(Behavior::Respond(DeliveryOutcome::Success));
        let (queue, dispatcher) = setup(client.clone(), DispatchConfig::default());
        let now = Utc::now();
        queue
            .enqueue(item("later", ChannelId::ChatWebhook, now + chrono::Duration::minutes(1)))
            .await
            .unwrap();

        assert_eq!(dispatcher.tick(now).await.unwrap(), TickSummary::default());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_channel_error_counts_as_transient() {
        let client = ScriptedClient::new(Behavior::Fail);
        let (queue, dispatcher) = setup(client, DispatchConfig::default());
        let now = Utc::now();
        queue.enqueue(item("k", ChannelId::ChatWebhook, now)).await.unwrap();

        let summary = dispatcher.tick(now).await.unwrap();

        assert_eq!(summary.rescheduled, 1);
        let stored = queue.get("k").await.unwrap().unwrap();
        assert_eq!(stored.status, WorkItemStatus::Pending);
        assert_eq!(stored.attempt_count, 1);
        assert!(stored.last_error.unwrap().starts_with("channel error"));
    }

    #[tokio::test]
    async fn test_missing_client_counts_as_transient() {
        let client = ScriptedClient::new(Behavior::Respond(DeliveryOutcome::Success));
        let (queue, dispatcher) = setup(client.clone(), DispatchConfig::default());
        let now = Utc::now();
        queue
            .enqueue(item("k", ChannelId::AutomationWebhook, now))
            .await
            .unwrap();

        dispatcher.tick(now).await.unwrap();

        let stored = queue.get("k").await.unwrap().unwrap();
        assert_eq!(stored.status, WorkItemStatus::Pending);
        assert!(stored.last_error.unwrap().contains("automation_webhook"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_returns_item_to_pending() {
        let client = ScriptedClient::new(Behavior::Hang);
        let (queue, dispatcher) = setup(
            client,
            DispatchConfig {
                max_concurrency: 1,
                attempt_timeout: Duration::from_millis(50),
            },
        );
        let now = Utc::now();
        queue.enqueue(item("k", ChannelId::ChatWebhook, now)).await.unwrap();

        dispatcher.tick(now).await.unwrap();

        let stored = queue.get("k").await.unwrap().unwrap();
        assert_eq!(stored.status, WorkItemStatus::Pending);
        assert!(stored.last_error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_panicking_client_does_not_strand_item() {
        let client = ScriptedClient::new(Behavior::Panic);
        let (queue, dispatcher) = setup(client, DispatchConfig::default());
        let now = Utc::now();
        queue.enqueue(item("k", ChannelId::ChatWebhook, now)).await.unwrap();

        let summary = dispatcher.tick(now).await.unwrap();

        assert_eq!(summary.rescheduled, 1);
        let stored = queue.get("k").await.unwrap().unwrap();
        assert_eq!(stored.status, WorkItemStatus::Pending);
        assert!(stored.last_error.unwrap().contains("dispatch task failed"));
    }

    #[tokio::test]
    async fn test_cancelled_tick_still_settles_items() {
        let client = ScriptedClient::new(Behavior::Hang);
        let (queue, dispatcher) = setup(
            client,
            DispatchConfig {
                max_concurrency: 4,
                attempt_timeout: Duration::from_millis(100),
            },
        );
        let now = Utc::now();
        queue.enqueue(item("k", ChannelId::ChatWebhook, now)).await.unwrap();

        let cancelled = tokio::time::timeout(Duration::from_millis(20), dispatcher.tick(now)).await;
        assert!(cancelled.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;

        let stored = queue.get("k").await.unwrap().unwrap();
        assert_eq!(stored.status, WorkItemStatus::Pending);
        assert_eq!(stored.attempt_count, 1);
        assert!(stored.last_error.unwrap().contains("timed out"));
        assert_eq!(stored.attempts[0].outcome, OutcomeKind::TransientFailure);
    }
}
