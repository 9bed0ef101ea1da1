//! Chat webhook channel: one embed per notification.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{http_outcome::post_json, iso_utc};
use crate::{
    application::services::channel::{ChannelClient, ChannelError, Delivery},
    domain::models::{ChannelId, ChatEmbed, DeliveryOutcome, NotificationPayload},
};

#[derive(Debug, Clone, Default)]
pub struct ChatWebhookConfig {
    pub enabled: bool,
    pub url: Option<String>,
    /// Used when a notification carries no label of its own.
    pub default_username: String,
}

pub struct ChatWebhookClient {
    http: Client,
    config: ChatWebhookConfig,
}

impl ChatWebhookClient {
    pub fn new(http: Client, config: ChatWebhookConfig) -> Arc<dyn ChannelClient> {
        Arc::new(Self { http, config }) as Arc<dyn ChannelClient>
    }

    fn destination(&self) -> Option<&str> {
        self.config
            .url
            .as_deref()
            .filter(|url| self.config.enabled && !url.trim().is_empty())
    }

    fn build_body<'a>(
        &'a self,
        delivery: &Delivery<'a>,
        embed: &'a ChatEmbed,
    ) -> ChatWebhookBody<'a> {
        let username = if delivery.label.trim().is_empty() {
            self.config.default_username.as_str()
        } else {
            delivery.label
        };

        ChatWebhookBody {
            username,
            content: None,
            embeds: vec![EmbedBody {
                title: &embed.title,
                description: &embed.description,
                color: parse_color(embed.color_hex.as_deref()),
                fields: embed
                    .fields
                    .iter()
                    .map(|field| EmbedFieldBody {
                        name: &field.name,
                        value: &field.value,
                        inline: field.inline,
                    })
                    .collect(),
                footer: embed
                    .footer
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| EmbedFooterBody { text }),
                timestamp: iso_utc(delivery.event_timestamp),
            }],
        }
    }
}

#[async_trait]
impl ChannelClient for ChatWebhookClient {
    fn channel(&self) -> ChannelId {
        ChannelId::ChatWebhook
    }

    fn is_enabled(&self) -> bool {
        self.destination().is_some()
    }

    async fn send(&self, delivery: Delivery<'_>) -> Result<DeliveryOutcome, ChannelError> {
        let Some(url) = self.destination() else {
            debug!(hash_key = delivery.hash_key, "Chat webhook disabled, skipping");
            return Ok(DeliveryOutcome::Success);
        };

        let NotificationPayload::ChatEmbed(embed) = delivery.payload else {
            return Err(ChannelError::PayloadMismatch {
                channel: ChannelId::ChatWebhook,
                payload: delivery.payload.channel(),
            });
        };

        let body = serde_json::to_vec(&self.build_body(&delivery, embed))?;
        let outcome = post_json(&self.http, url, body).await;

        debug!(
            hash_key = delivery.hash_key,
            outcome = ?outcome.kind(),
            "Chat webhook attempt finished"
        );
        Ok(outcome)
    }
}

/// `#RRGGBB`, `RRGGBB` or `0xRRGGBB`; anything else renders as black.
fn parse_color(hex: Option<&str>) -> u32 {
    hex.map(|value| {
        let value = value.trim();
        value
            .strip_prefix('#')
            .or_else(|| value.strip_prefix("0x"))
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value)
    })
    .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
    .and_then(|digits| u32::from_str_radix(digits, 16).ok())
    .filter(|color| *color <= 0xFF_FF_FF)
    .unwrap_or(0)
}

#[derive(Debug, Serialize)]
struct ChatWebhookBody<'a> {
    username: &'a str,
    content: Option<&'a str>,
    embeds: Vec<EmbedBody<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedBody<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: Vec<EmbedFieldBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooterBody<'a>>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedFieldBody<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct EmbedFooterBody<'a> {
    text: &'a str,
}
