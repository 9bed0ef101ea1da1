use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::models::{ChannelId, DeliveryOutcome, NotificationPayload};

/// Conditions a channel cannot turn into a delivery outcome. The dispatcher
/// records them as transient failures of the current attempt.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{channel} cannot deliver a {payload} payload")]
    PayloadMismatch {
        channel: ChannelId,
        payload: ChannelId,
    },
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Borrowed view of one work item handed to a channel for a single attempt.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    pub hash_key: &'a str,
    pub label: &'a str,
    pub payload: &'a NotificationPayload,
    pub event_timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ChannelClient: Send + Sync {
    fn channel(&self) -> ChannelId;

    /// Disabled channels report success without touching the network.
    fn is_enabled(&self) -> bool;

    /// One outbound request, no internal retry.
    async fn send(&self, delivery: Delivery<'_>) -> Result<DeliveryOutcome, ChannelError>;
}

#[derive(Clone)]
pub struct ChannelGateway {
    clients: HashMap<ChannelId, Arc<dyn ChannelClient>>,
}

impl ChannelGateway {
    pub fn new(clients: Vec<Arc<dyn ChannelClient>>) -> Self {
        let mut map = HashMap::new();
        for client in clients {
            map.insert(client.channel(), client);
        }
        Self { clients: map }
    }

    pub fn get(&self, channel: ChannelId) -> Option<Arc<dyn ChannelClient>> {
        self.clients.get(&channel).cloned()
    }

    pub fn is_enabled(&self, channel: ChannelId) -> bool {
        self.clients
            .get(&channel)
            .is_some_and(|client| client.is_enabled())
    }
}
