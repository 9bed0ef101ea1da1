use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{
    ChannelKind, OutcomeKindDto, SubmitResultDto, WorkItemStatusDto,
};

#[derive(Object)]
pub struct ChannelSubmissionDto {
    pub channel: ChannelKind,
    pub hash_key: String,
    pub result: SubmitResultDto,
}

#[derive(Object)]
pub struct VoyageArrivalResponseDto {
    pub submissions: Vec<ChannelSubmissionDto>,
}

#[derive(Object)]
pub struct WorkItemDto {
    pub hash_key: String,
    pub target: ChannelKind,
    pub label: String,
    pub status: WorkItemStatusDto,
    pub attempt_count: u32,
    pub next_attempt_at: String,
    pub last_attempt_at: Option<String>,
    pub last_error: Option<String>,
    pub event_timestamp: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct DeliveryAttemptDto {
    pub id: Uuid,
    pub attempt_number: u32,
    pub attempted_at: String,
    pub outcome: OutcomeKindDto,
    pub detail: Option<String>,
}

#[derive(Object)]
pub struct QueueStatsDto {
    pub pending: u64,
    pub in_flight: u64,
    pub dead_lettered: u64,
}
