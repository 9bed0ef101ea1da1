use poem::http::StatusCode;

use crate::domain::errors::DomainError;

pub fn map_error(err: anyhow::Error) -> poem::Error {
    let status = match err.downcast_ref::<DomainError>() {
        Some(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!(error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    poem::Error::from_string(err.to_string(), status)
}

pub fn not_found(message: impl Into<String>) -> poem::Error {
    poem::Error::from_string(message.into(), StatusCode::NOT_FOUND)
}
