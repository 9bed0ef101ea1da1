use std::sync::Arc;

use crate::domain::repositories::{NotificationQueue, QueueStats};

pub struct GetQueueStatsUseCase {
    queue: Arc<dyn NotificationQueue>,
}

impl GetQueueStatsUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self) -> anyhow::Result<QueueStats> {
        self.queue.stats().await
    }
}
