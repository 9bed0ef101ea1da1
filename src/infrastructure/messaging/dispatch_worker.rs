use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::application::handlers::notification_dispatcher::NotificationDispatcher;

/// Calls [`NotificationDispatcher::tick`] on a fixed cadence until shutdown
/// is signalled.
pub struct DispatchWorker {
    dispatcher: Arc<NotificationDispatcher>,
    interval: Duration,
}

impl DispatchWorker {
    pub fn new(dispatcher: Arc<NotificationDispatcher>, interval: Duration) -> Self {
        Self {
            dispatcher,
            interval,
        }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Dispatch worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.dispatcher.tick(Utc::now()).await {
                        tracing::error!(error = %err, "Dispatch tick failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Dispatch worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            handlers::notification_dispatcher::DispatchConfig, services::channel::ChannelGateway,
        },
        domain::{
            models::{
                ChannelId, ChatEmbed, NewNotification, NotificationPayload, NotificationWorkItem,
            },
            repositories::NotificationQueue,
        },
        infrastructure::repositories::in_memory::InMemoryNotificationQueue,
    };

    #[tokio::test]
    async fn test_worker_ticks_until_shutdown() {
        let queue = Arc::new(InMemoryNotificationQueue::default());
        // No clients registered: every attempt fails transiently, which is
        // enough to observe that the worker ticked.
        let dispatcher = Arc::new(NotificationDispatcher::new(
            queue.clone(),
            ChannelGateway::new(vec![]),
            DispatchConfig::default(),
        ));
        let now = Utc::now();
        queue
            .enqueue(NotificationWorkItem::new(
                NewNotification {
                    hash_key: "k".to_string(),
                    target: ChannelId::ChatWebhook,
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
            ))
            .await
            .unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle =
            DispatchWorker::new(dispatcher, Duration::from_millis(10)).spawn(shutdown_rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop")
            .unwrap();

        let item = queue.get("k").await.unwrap().unwrap();
        assert_eq!(item.attempt_count, 1);
    }
}
