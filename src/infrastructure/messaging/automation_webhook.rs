//! Automation webhook channel: flat property bag plus a metadata block.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{http_outcome::post_json, iso_utc};
use crate::{
    application::services::channel::{ChannelClient, ChannelError, Delivery},
    domain::models::{AutomationPayload, ChannelId, DeliveryOutcome, NotificationPayload},
};

const HASH_KEY_SHORT_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct AutomationWebhookConfig {
    pub enabled: bool,
    pub url: Option<String>,
}

pub struct AutomationWebhookClient {
    http: Client,
    config: AutomationWebhookConfig,
}

impl AutomationWebhookClient {
    pub fn new(http: Client, config: AutomationWebhookConfig) -> Arc<dyn ChannelClient> {
        Arc::new(Self { http, config }) as Arc<dyn ChannelClient>
    }

    fn destination(&self) -> Option<&str> {
        self.config
            .url
            .as_deref()
            .filter(|url| self.config.enabled && !url.trim().is_empty())
    }

    fn build_body<'a>(
        delivery: &Delivery<'a>,
        payload: &'a AutomationPayload,
    ) -> AutomationWebhookBody<'a> {
        AutomationWebhookBody {
            payload: &payload.properties,
            metadata: Metadata {
                character_label: delivery.label,
                submarine_label: &payload.submarine_label,
                arrival_utc: iso_utc(delivery.event_timestamp),
                status: &payload.status,
                hash_key_short: short_hash(delivery.hash_key),
            },
        }
    }
}

#[async_trait]
impl ChannelClient for AutomationWebhookClient {
    fn channel(&self) -> ChannelId {
        ChannelId::AutomationWebhook
    }

    fn is_enabled(&self) -> bool {
        self.destination().is_some()
    }

    async fn send(&self, delivery: Delivery<'_>) -> Result<DeliveryOutcome, ChannelError> {
        let Some(url) = self.destination() else {
            debug!(hash_key = delivery.hash_key, "Automation webhook disabled, skipping");
            return Ok(DeliveryOutcome::Success);
        };

        let NotificationPayload::Automation(payload) = delivery.payload else {
            return Err(ChannelError::PayloadMismatch {
                channel: ChannelId::AutomationWebhook,
                payload: delivery.payload.channel(),
            });
        };

        let body = serde_json::to_vec(&Self::build_body(&delivery, payload))?;
        let outcome = post_json(&self.http, url, body).await;

        debug!(
            hash_key = delivery.hash_key,
            outcome = ?outcome.kind(),
            "Automation webhook attempt finished"
        );
        Ok(outcome)
    }
}

fn short_hash(hash_key: &str) -> &str {
    match hash_key.char_indices().nth(HASH_KEY_SHORT_LEN) {
        Some((end, _)) => &hash_key[..end],
        None => hash_key,
    }
}

#[derive(Debug, Serialize)]
struct AutomationWebhookBody<'a> {
    payload: &'a Map<String, Value>,
    metadata: Metadata<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata<'a> {
    character_label: &'a str,
    submarine_label: &'a str,
    arrival_utc: String,
    status: &'a str,
    hash_key_short: &'a str,
}
