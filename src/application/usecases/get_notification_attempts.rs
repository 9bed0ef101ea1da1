use std::sync::Arc;

use crate::domain::{
    errors::DomainError, models::DeliveryAttempt, repositories::NotificationQueue,
};

pub struct GetNotificationAttemptsUseCase {
    queue: Arc<dyn NotificationQueue>,
}

impl GetNotificationAttemptsUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self, hash_key: &str) -> anyhow::Result<Vec<DeliveryAttempt>> {
        let item = self
            .queue
            .get(hash_key)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("notification {hash_key}")))?;
        Ok(item.attempts)
    }
}
