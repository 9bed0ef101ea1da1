use chrono::{DateTime, Utc};
use poem_openapi::Object;

use crate::presentation::models::VoyageOutcomeKind;

#[derive(Object, Debug)]
pub struct VoyageArrivalRequestDto {
    #[oai(validator(min_length = 1))]
    pub character: String,
    #[oai(validator(min_length = 1))]
    pub world: String,
    #[oai(validator(min_length = 1))]
    pub submarine: String,
    #[oai(validator(min_length = 1))]
    pub voyage_id: String,
    pub arrival_at: DateTime<Utc>,
    pub outcome: VoyageOutcomeKind,
}

#[derive(Object, Debug)]
pub struct RequeueRequestDto {
    #[oai(validator(min_length = 1))]
    pub hash_key: String,
}
