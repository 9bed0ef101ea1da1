pub mod channel;
pub mod notification;
pub mod outcome;
pub mod payload;
pub mod voyage;

pub use channel::ChannelId;
pub use notification::{
    DeliveryAttempt, NewNotification, NotificationWorkItem, Transition, WorkItemStatus,
};
pub use outcome::{DeliveryOutcome, OutcomeKind};
pub use payload::{AutomationPayload, ChatEmbed, EmbedField, NotificationPayload};
pub use voyage::{VoyageEvent, VoyageOutcome};
