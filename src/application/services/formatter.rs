//! Turns a completed voyage into channel-specific notifications.
//!
//! Pure and deterministic: the same event always yields the same hash keys
//! and payloads, so re-reporting an arrival is an idempotent submission.

use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::domain::models::{
    AutomationPayload, ChannelId, ChatEmbed, EmbedField, NewNotification, NotificationPayload,
    VoyageEvent, VoyageOutcome,
};

const RETURNED_COLOR: &str = "#2ECC71";
const FAILED_COLOR: &str = "#E74C3C";

pub fn voyage_hash_key(event: &VoyageEvent, target: ChannelId) -> String {
    let mut hasher = Sha256::new();
    hasher.update(event.identity().as_bytes());
    hasher.update(b"|");
    hasher.update(target.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

pub fn format_voyage(event: &VoyageEvent, target: ChannelId) -> NewNotification {
    let payload = match target {
        ChannelId::ChatWebhook => NotificationPayload::ChatEmbed(chat_embed(event)),
        ChannelId::AutomationWebhook => NotificationPayload::Automation(automation(event)),
    };

    NewNotification {
        hash_key: voyage_hash_key(event, target),
        target,
        label: event.character_label(),
        payload,
        event_timestamp: event.arrival_at,
    }
}

fn chat_embed(event: &VoyageEvent) -> ChatEmbed {
    let (title, description, color) = match event.outcome {
        VoyageOutcome::Returned => (
            "Submarine returned",
            format!(
                "{} has returned from voyage {}.",
                event.submarine, event.voyage_id
            ),
            RETURNED_COLOR,
        ),
        VoyageOutcome::Failed => (
            "Voyage failed",
            format!(
                "{} did not complete voyage {}.",
                event.submarine, event.voyage_id
            ),
            FAILED_COLOR,
        ),
    };

    ChatEmbed {
        title: title.to_string(),
        description,
        color_hex: Some(color.to_string()),
        fields: vec![
            EmbedField::inline("Submarine", &event.submarine),
            EmbedField::inline("Character", event.character_label()),
            EmbedField::inline(
                "Arrival",
                event.arrival_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
        ],
        footer: Some(format!("Voyage {}", event.voyage_id)),
    }
}

fn automation(event: &VoyageEvent) -> AutomationPayload {
    let mut properties = Map::new();
    properties.insert("event".to_string(), json!("voyage_completed"));
    properties.insert("character".to_string(), Value::from(event.character.as_str()));
    properties.insert("world".to_string(), Value::from(event.world.as_str()));
    properties.insert("submarine".to_string(), Value::from(event.submarine.as_str()));
    properties.insert("voyageId".to_string(), Value::from(event.voyage_id.as_str()));
    properties.insert("outcome".to_string(), Value::from(event.outcome.as_str()));

    AutomationPayload {
        properties,
        submarine_label: event.submarine.clone(),
        status: event.outcome.as_str().to_string(),
    }
}
