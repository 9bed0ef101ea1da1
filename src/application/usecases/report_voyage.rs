use std::sync::Arc;

use crate::{
    application::{
        services::formatter::format_voyage,
        usecases::submit_notification::{SubmitNotificationUseCase, SubmitResult},
    },
    domain::models::{ChannelId, VoyageEvent},
};

pub struct ReportVoyageUseCase {
    submit: Arc<SubmitNotificationUseCase>,
}

pub struct ChannelSubmission {
    pub channel: ChannelId,
    pub hash_key: String,
    pub result: SubmitResult,
}

impl ReportVoyageUseCase {
    pub fn new(submit: Arc<SubmitNotificationUseCase>) -> Self {
        Self { submit }
    }

    /// Fans one voyage out to every channel.
    pub async fn execute(&self, event: VoyageEvent) -> anyhow::Result<Vec<ChannelSubmission>> {
        let mut submissions = Vec::with_capacity(ChannelId::ALL.len());
        for channel in ChannelId::ALL {
            let notification = format_voyage(&event, channel);
            let hash_key = notification.hash_key.clone();
            let result = self.submit.execute(notification).await?;
            submissions.push(ChannelSubmission {
                channel,
                hash_key,
                result,
            });
        }
        Ok(submissions)
    }
}
