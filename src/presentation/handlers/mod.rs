pub mod participant_handler;
pub mod registration_handler;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::{DomainError, RepositoryError},
    services::identity_service::{Identity, IdentityVerifier},
};

/// json body of every error response
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// json body of responses that carry no data
#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn error_response(error: DomainError) -> Response {
    let status = match &error {
        DomainError::EventNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidRegistration(_) => StatusCode::BAD_REQUEST,
        DomainError::ParticipantAlreadyRegistered { .. } => StatusCode::CONFLICT,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DomainError::Repository(RepositoryError::DatabaseError(_)) => {
            tracing::error!(error = %error, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = ErrorResponse {
        error: error.to_string(),
    };
    (status, Json(body)).into_response()
}

pub fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })).into_response()
}

/// Resolve the caller from the `Authorization: Bearer <token>` header
pub fn authenticate<V: IdentityVerifier>(
    headers: &HeaderMap,
    verifier: &V,
) -> Result<Identity, DomainError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(DomainError::Unauthorized)?;

    verifier.verify(token.trim())
}
