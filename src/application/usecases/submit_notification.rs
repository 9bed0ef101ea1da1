use std::sync::Arc;

use chrono::Utc;

use crate::{
    application::services::channel::ChannelGateway,
    domain::{
        errors::DomainError,
        models::{NewNotification, NotificationWorkItem},
        repositories::NotificationQueue,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    Queued,
    AlreadyQueued,
    /// Target channel is switched off; nothing was queued.
    Disabled,
}

pub struct SubmitNotificationUseCase {
    queue: Arc<dyn NotificationQueue>,
    gateway: ChannelGateway,
}

impl SubmitNotificationUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>, gateway: ChannelGateway) -> Self {
        Self { queue, gateway }
    }

    pub async fn execute(&self, request: NewNotification) -> anyhow::Result<SubmitResult> {
        if request.hash_key.trim().is_empty() {
            return Err(DomainError::Validation("hash key must not be empty".to_string()).into());
        }
        if request.payload.channel() != request.target {
            return Err(DomainError::Validation(format!(
                "{} payload cannot target {}",
                request.payload.channel(),
                request.target
            ))
            .into());
        }

        if !self.gateway.is_enabled(request.target) {
            tracing::debug!(
                hash_key = %request.hash_key,
                target = %request.target,
                "Channel disabled, notification dropped"
            );
            return Ok(SubmitResult::Disabled);
        }

        let item = NotificationWorkItem::new(request, Utc::now());
        if self.queue.enqueue(item).await? {
            Ok(SubmitResult::Queued)
        } else {
            Ok(SubmitResult::AlreadyQueued)
        }
    }
}
