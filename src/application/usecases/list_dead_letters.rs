use std::sync::Arc;

use crate::domain::{models::NotificationWorkItem, repositories::NotificationQueue};

pub struct ListDeadLettersUseCase {
    queue: Arc<dyn NotificationQueue>,
}

impl ListDeadLettersUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self) -> anyhow::Result<Vec<NotificationWorkItem>> {
        self.queue.dead_letters().await
    }
}
