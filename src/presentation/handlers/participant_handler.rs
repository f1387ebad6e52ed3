use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        models::participant::{NewParticipant, Participant, ParticipantId},
        repositories::participant_repository::ParticipantRepository,
    },
    presentation::handlers::{error_response, not_found},
    usecase::participant_usecase::ParticipantUsecase,
};

// Request

/// json for creating a participant
#[derive(Serialize, Deserialize)]
pub struct CreateParticipantRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

// Response

#[derive(Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub id: ParticipantId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id(),
            first_name: participant.first_name().to_string(),
            last_name: participant.last_name().to_string(),
            email: participant.email().to_string(),
            phone: participant.phone().map(str::to_string),
            created_at: participant.created_at(),
        }
    }
}

/// function return Router object
/// Suppose to be nested by main router under "/api/participants"
pub fn create_participant_router<P: ParticipantRepository + Clone + 'static>(
    participant_service: ParticipantUsecase<P>,
) -> Router {
    let state = ParticipantState {
        participant_service: Arc::new(participant_service),
    };

    Router::new()
        .route("/", post(create::<P>))
        .route("/{id}", get(get_participant::<P>))
        .with_state(state)
}

#[derive(Clone)]
pub struct ParticipantState<P: ParticipantRepository> {
    pub participant_service: Arc<ParticipantUsecase<P>>,
}

async fn create<P: ParticipantRepository>(
    State(state): State<ParticipantState<P>>,
    Json(payload): Json<CreateParticipantRequest>,
) -> Response {
    let participant = match NewParticipant::new(
        payload.first_name,
        payload.last_name,
        payload.email,
        payload.phone,
    ) {
        Ok(participant) => participant,
        Err(e) => return error_response(e),
    };

    match state.participant_service.create_participant(participant).await {
        Ok(created) => {
            (StatusCode::CREATED, Json(ParticipantResponse::from(created))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_participant<P: ParticipantRepository>(
    State(state): State<ParticipantState<P>>,
    Path(id): Path<ParticipantId>,
) -> Response {
    match state.participant_service.get_participant(id).await {
        Ok(Some(participant)) => {
            (StatusCode::OK, Json(ParticipantResponse::from(participant))).into_response()
        }
        Ok(None) => not_found(format!("Participant with id {id} not found")),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use http_body_util::BodyExt;
    use rstest::*;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::InMemoryParticipantRepository;

    #[fixture]
    fn test_app() -> Router {
        let usecase = ParticipantUsecase::new(InMemoryParticipantRepository::new());
        Router::new().nest("/api/participants", create_participant_router(usecase))
    }

    async fn create_request(app: &Router, request: &CreateParticipantRequest) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/participants")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_string(request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn request(email: &str) -> CreateParticipantRequest {
        CreateParticipantRequest {
            first_name: "Zofia".to_string(),
            last_name: "Lewandowska".to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_and_get_positive(test_app: Router) {
        let response = create_request(&test_app, &request("zofia@example.com")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let created: ParticipantResponse = serde_json::from_slice(&bytes).unwrap();

        let response = test_app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/participants/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let fetched: ParticipantResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fetched.email, "zofia@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_invalid_email_negative(test_app: Router) {
        let response = create_request(&test_app, &request("not-an-email")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_duplicated_email_negative(test_app: Router) {
        create_request(&test_app, &request("zofia@example.com")).await;
        let response = create_request(&test_app, &request("zofia@example.com")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_get_unknown_negative(test_app: Router) {
        let response = test_app
            .oneshot(
                Request::builder()
                    .uri("/api/participants/12")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
