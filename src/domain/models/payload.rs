use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::channel::ChannelId;

/// Formatted notification content. The queue never looks inside; each
/// variant is rendered to its wire format by the matching channel client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    ChatEmbed(ChatEmbed),
    Automation(AutomationPayload),
}

impl NotificationPayload {
    pub fn channel(&self) -> ChannelId {
        match self {
            NotificationPayload::ChatEmbed(_) => ChannelId::ChatWebhook,
            NotificationPayload::Automation(_) => ChannelId::AutomationWebhook,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatEmbed {
    pub title: String,
    pub description: String,
    /// Hex color such as `#2ECC71`; rendered as `0` when absent or malformed.
    pub color_hex: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationPayload {
    pub properties: Map<String, Value>,
    pub submarine_label: String,
    pub status: String,
}
