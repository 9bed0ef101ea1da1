use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use crate::{
    domain::models::VoyageEvent,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::map_error,
        mappers::map_submission,
        requests::VoyageArrivalRequestDto,
        responses::VoyageArrivalResponseDto,
    },
};

#[derive(Clone)]
pub struct VoyagesEndpoints {
    state: Arc<ApiState>,
}

impl VoyagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl VoyagesEndpoints {
    /// Queues one notification per enabled channel. Reporting the same
    /// arrival again is a no-op while the earlier notifications are queued.
    #[oai(
        path = "/voyages/arrivals",
        method = "post",
        tag = EndpointsTags::Voyages,
    )]
    pub async fn report_arrival(
        &self,
        request: Json<VoyageArrivalRequestDto>,
    ) -> poem::Result<Json<VoyageArrivalResponseDto>> {
        let event = VoyageEvent {
            character: request.character.clone(),
            world: request.world.clone(),
            submarine: request.submarine.clone(),
            voyage_id: request.voyage_id.clone(),
            arrival_at: request.arrival_at,
            outcome: request.outcome.into(),
        };

        let submissions = self
            .state
            .report_voyage_usecase
            .execute(event)
            .await
            .map_err(map_error)?;

        Ok(Json(VoyageArrivalResponseDto {
            submissions: submissions.iter().map(map_submission).collect(),
        }))
    }
}
