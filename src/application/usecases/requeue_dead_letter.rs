use std::sync::Arc;

use chrono::Utc;

use crate::domain::repositories::NotificationQueue;

pub struct RequeueDeadLetterUseCase {
    queue: Arc<dyn NotificationQueue>,
}

impl RequeueDeadLetterUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>) -> Self {
        Self { queue }
    }

    /// `false` when no dead letter holds this key.
    pub async fn execute(&self, hash_key: &str) -> anyhow::Result<bool> {
        let requeued = self
            .queue
            .try_requeue_dead_letter(hash_key, Utc::now())
            .await?;
        if !requeued {
            tracing::debug!(hash_key, "Requeue requested for unknown dead letter");
        }
        Ok(requeued)
    }
}
