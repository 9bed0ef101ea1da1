use std::sync::Arc;

use poem_openapi::{OpenApi, OpenApiService, Tags};

use crate::{
    application::{
        services::channel::ChannelGateway,
        usecases::{
            get_notification_attempts::GetNotificationAttemptsUseCase,
            get_queue_stats::GetQueueStatsUseCase, list_dead_letters::ListDeadLettersUseCase,
            list_pending::ListPendingUseCase, report_voyage::ReportVoyageUseCase,
            requeue_dead_letter::RequeueDeadLetterUseCase,
            submit_notification::SubmitNotificationUseCase,
        },
    },
    domain::repositories::NotificationQueue,
    presentation::http::endpoints::{
        health::HealthEndpoints, notifications::NotificationsEndpoints,
        voyages::VoyagesEndpoints,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub report_voyage_usecase: Arc<ReportVoyageUseCase>,
    pub list_pending_usecase: Arc<ListPendingUseCase>,
    pub list_dead_letters_usecase: Arc<ListDeadLettersUseCase>,
    pub requeue_dead_letter_usecase: Arc<RequeueDeadLetterUseCase>,
    pub get_attempts_usecase: Arc<GetNotificationAttemptsUseCase>,
    pub queue_stats_usecase: Arc<GetQueueStatsUseCase>,
}

impl ApiState {
    pub fn new(queue: Arc<dyn NotificationQueue>, gateway: ChannelGateway) -> Self {
        let submit = Arc::new(SubmitNotificationUseCase::new(queue.clone(), gateway));

        Self {
            report_voyage_usecase: Arc::new(ReportVoyageUseCase::new(submit)),
            list_pending_usecase: Arc::new(ListPendingUseCase::new(queue.clone())),
            list_dead_letters_usecase: Arc::new(ListDeadLettersUseCase::new(queue.clone())),
            requeue_dead_letter_usecase: Arc::new(RequeueDeadLetterUseCase::new(queue.clone())),
            get_attempts_usecase: Arc::new(GetNotificationAttemptsUseCase::new(queue.clone())),
            queue_stats_usecase: Arc::new(GetQueueStatsUseCase::new(queue)),
        }
    }
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Voyages,
    Notifications,
}

pub fn api_service(state: Arc<ApiState>) -> OpenApiService<impl OpenApi, ()> {
    OpenApiService::new(
        (
            HealthEndpoints,
            VoyagesEndpoints::new(state.clone()),
            NotificationsEndpoints::new(state),
        ),
        "Voyage Notifier API",
        env!("CARGO_PKG_VERSION"),
    )
}
