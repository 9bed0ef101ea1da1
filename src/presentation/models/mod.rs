use poem_openapi::Enum;

use crate::{
    application::usecases::submit_notification::SubmitResult,
    domain::models::{ChannelId, OutcomeKind, VoyageOutcome, WorkItemStatus},
};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelKind {
    #[oai(rename = "chat_webhook")]
    ChatWebhook,
    #[oai(rename = "automation_webhook")]
    AutomationWebhook,
}

impl From<ChannelId> for ChannelKind {
    fn from(value: ChannelId) -> Self {
        match value {
            ChannelId::ChatWebhook => ChannelKind::ChatWebhook,
            ChannelId::AutomationWebhook => ChannelKind::AutomationWebhook,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum VoyageOutcomeKind {
    #[oai(rename = "returned")]
    Returned,
    #[oai(rename = "failed")]
    Failed,
}

impl From<VoyageOutcomeKind> for VoyageOutcome {
    fn from(value: VoyageOutcomeKind) -> Self {
        match value {
            VoyageOutcomeKind::Returned => VoyageOutcome::Returned,
            VoyageOutcomeKind::Failed => VoyageOutcome::Failed,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[oai(rename_all = "snake_case")]
pub enum WorkItemStatusDto {
    Pending,
    InFlight,
    DeadLettered,
}

impl From<WorkItemStatus> for WorkItemStatusDto {
    fn from(value: WorkItemStatus) -> Self {
        match value {
            WorkItemStatus::Pending => WorkItemStatusDto::Pending,
            WorkItemStatus::InFlight => WorkItemStatusDto::InFlight,
            WorkItemStatus::DeadLettered => WorkItemStatusDto::DeadLettered,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[oai(rename_all = "snake_case")]
pub enum OutcomeKindDto {
    Delivered,
    TransientFailure,
    RateLimited,
    PermanentFailure,
}

impl From<OutcomeKind> for OutcomeKindDto {
    fn from(value: OutcomeKind) -> Self {
        match value {
            OutcomeKind::Delivered => OutcomeKindDto::Delivered,
            OutcomeKind::TransientFailure => OutcomeKindDto::TransientFailure,
            OutcomeKind::RateLimited => OutcomeKindDto::RateLimited,
            OutcomeKind::PermanentFailure => OutcomeKindDto::PermanentFailure,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[oai(rename_all = "snake_case")]
pub enum SubmitResultDto {
    Queued,
    AlreadyQueued,
    Disabled,
}

impl From<SubmitResult> for SubmitResultDto {
    fn from(value: SubmitResult) -> Self {
        match value {
            SubmitResult::Queued => SubmitResultDto::Queued,
            SubmitResult::AlreadyQueued => SubmitResultDto::AlreadyQueued,
            SubmitResult::Disabled => SubmitResultDto::Disabled,
        }
    }
}
