use crate::{
    application::usecases::report_voyage::ChannelSubmission,
    domain::{
        models::{DeliveryAttempt, NotificationWorkItem},
        repositories::QueueStats,
    },
    presentation::http::responses::{
        ChannelSubmissionDto, DeliveryAttemptDto, QueueStatsDto, WorkItemDto,
    },
};

pub fn map_work_item(item: &NotificationWorkItem) -> WorkItemDto {
    WorkItemDto {
        hash_key: item.hash_key.clone(),
        target: item.target.into(),
        label: item.label.clone(),
        status: item.status.into(),
        attempt_count: item.attempt_count,
        next_attempt_at: item.next_attempt_at.to_rfc3339(),
        last_attempt_at: item.last_attempt_at.map(|at| at.to_rfc3339()),
        last_error: item.last_error.clone(),
        event_timestamp: item.event_timestamp.to_rfc3339(),
        created_at: item.created_at.to_rfc3339(),
        updated_at: item.updated_at.to_rfc3339(),
    }
}

pub fn map_attempt(attempt: &DeliveryAttempt) -> DeliveryAttemptDto {
    DeliveryAttemptDto {
        id: attempt.id,
        attempt_number: attempt.attempt_number,
        attempted_at: attempt.attempted_at.to_rfc3339(),
        outcome: attempt.outcome.into(),
        detail: attempt.detail.clone(),
    }
}

pub fn map_submission(submission: &ChannelSubmission) -> ChannelSubmissionDto {
    ChannelSubmissionDto {
        channel: submission.channel.into(),
        hash_key: submission.hash_key.clone(),
        result: submission.result.into(),
    }
}

pub fn map_stats(stats: QueueStats) -> QueueStatsDto {
    QueueStatsDto {
        pending: stats.pending as u64,
        in_flight: stats.in_flight as u64,
        dead_lettered: stats.dead_lettered as u64,
    }
}
