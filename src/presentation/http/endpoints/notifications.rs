use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Path, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    errors::{map_error, not_found},
    mappers::{map_attempt, map_stats, map_work_item},
    requests::RequeueRequestDto,
    responses::{DeliveryAttemptDto, QueueStatsDto, WorkItemDto},
};

#[derive(Clone)]
pub struct NotificationsEndpoints {
    state: Arc<ApiState>,
}

impl NotificationsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl NotificationsEndpoints {
    #[oai(
        path = "/notifications/pending",
        method = "get",
        tag = EndpointsTags::Notifications,
    )]
    pub async fn list_pending(&self) -> PoemResult<Json<Vec<WorkItemDto>>> {
        let items = self
            .state
            .list_pending_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(items.iter().map(map_work_item).collect()))
    }

    #[oai(
        path = "/notifications/dead-letters",
        method = "get",
        tag = EndpointsTags::Notifications,
    )]
    pub async fn list_dead_letters(&self) -> PoemResult<Json<Vec<WorkItemDto>>> {
        let items = self
            .state
            .list_dead_letters_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(items.iter().map(map_work_item).collect()))
    }

    #[oai(
        path = "/notifications/stats",
        method = "get",
        tag = EndpointsTags::Notifications,
    )]
    pub async fn stats(&self) -> PoemResult<Json<QueueStatsDto>> {
        let stats = self
            .state
            .queue_stats_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(map_stats(stats)))
    }

    #[oai(
        path = "/notifications/:hash_key/attempts",
        method = "get",
        tag = EndpointsTags::Notifications,
    )]
    pub async fn get_attempts(
        &self,
        hash_key: Path<String>,
    ) -> PoemResult<Json<Vec<DeliveryAttemptDto>>> {
        let attempts = self
            .state
            .get_attempts_usecase
            .execute(&hash_key.0)
            .await
            .map_err(map_error)?;

        Ok(Json(attempts.iter().map(map_attempt).collect()))
    }

    #[oai(
        path = "/notifications/actions/requeue",
        method = "post",
        tag = EndpointsTags::Notifications,
    )]
    pub async fn requeue(&self, request: Json<RequeueRequestDto>) -> PoemResult<()> {
        let requeued = self
            .state
            .requeue_dead_letter_usecase
            .execute(&request.hash_key)
            .await
            .map_err(map_error)?;

        if !requeued {
            return Err(not_found(format!(
                "no dead letter with hash key {}",
                request.hash_key
            )));
        }

        Ok(())
    }
}
