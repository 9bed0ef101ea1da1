use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelId {
    ChatWebhook,
    AutomationWebhook,
}

impl ChannelId {
    pub const ALL: [ChannelId; 2] = [ChannelId::ChatWebhook, ChannelId::AutomationWebhook];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelId::ChatWebhook => "chat_webhook",
            ChannelId::AutomationWebhook => "automation_webhook",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
