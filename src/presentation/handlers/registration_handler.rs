use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        models::{
            event::EventId,
            participant::{NewParticipant, ParticipantId},
            registration::{Registration, RegistrationId, RegistrationStatus},
        },
        repositories::{
            event_repository::EventRepository, participant_repository::ParticipantRepository,
            registration_repository::RegistrationRepository,
        },
        services::{identity_service::IdentityVerifier, monitoring_service::MonitoringPublisher},
    },
    presentation::handlers::{
        MessageResponse, authenticate, error_response, not_found,
        participant_handler::ParticipantResponse,
    },
    usecase::{participant_usecase::ParticipantUsecase, registration_usecase::RegistrationUsecase},
};

// Request

/// json for registering a known participant
#[derive(Serialize, Deserialize)]
pub struct RegisterParticipantRequest {
    pub event_id: EventId,
    pub participant_id: ParticipantId,
}

/// json for registering the authenticated caller
#[derive(Serialize, Deserialize)]
pub struct RegisterSelfRequest {
    pub event_id: EventId,
}

// Response

#[derive(Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub participant_id: ParticipantId,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub waiting_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantResponse>,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id(),
            event_id: registration.event_id(),
            participant_id: registration.participant_id(),
            status: registration.status(),
            registered_at: registration.registered_at(),
            cancelled_at: registration.cancelled_at(),
            checked_in_at: registration.checked_in_at(),
            waiting_position: registration.waiting_position(),
            participant: None,
        }
    }
}

/// json for "is the caller registered for this event"
#[derive(Serialize, Deserialize)]
pub struct CheckRegistrationResponse {
    pub is_registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<RegistrationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RegistrationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_position: Option<i32>,
}

/* Router Function and Handler Function */

/// function return Router object
/// Suppose to be nested by main router under "/api/registrations"
pub fn create_registration_router<E, P, R, M, V>(
    registration_service: RegistrationUsecase<E, P, R, M>,
    participant_service: ParticipantUsecase<P>,
    identity_verifier: V,
) -> Router
where
    E: EventRepository + Clone + 'static,
    P: ParticipantRepository + Clone + 'static,
    R: RegistrationRepository + Clone + 'static,
    M: MonitoringPublisher + Clone + 'static,
    V: IdentityVerifier + Clone + 'static,
{
    let state = AppState {
        registration_service: Arc::new(registration_service),
        participant_service: Arc::new(participant_service),
        identity_verifier: Arc::new(identity_verifier),
    };

    Router::new()
        .route("/", post(register::<E, P, R, M, V>))
        .route("/register", post(register_self::<E, P, R, M, V>))
        .route("/my-registrations", get(my_registrations::<E, P, R, M, V>))
        .route("/{id}", get(get_registration::<E, P, R, M, V>))
        .route("/{id}/checkin", post(check_in::<E, P, R, M, V>))
        .route("/{id}/cancel", post(cancel::<E, P, R, M, V>))
        .route(
            "/event/{event_id}",
            get(get_event_registrations::<E, P, R, M, V>),
        )
        .route(
            "/event/{event_id}/waiting",
            get(get_waiting_list::<E, P, R, M, V>),
        )
        .route(
            "/event/{event_id}/check",
            get(check_registration::<E, P, R, M, V>),
        )
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState<
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
> {
    pub registration_service: Arc<RegistrationUsecase<E, P, R, M>>,
    pub participant_service: Arc<ParticipantUsecase<P>>,
    pub identity_verifier: Arc<V>,
}

type RegistrationState<E, P, R, M, V> = State<AppState<E, P, R, M, V>>;

// handler function

/// handler function for registering a participant by id
async fn register<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    Json(payload): Json<RegisterParticipantRequest>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    match state
        .registration_service
        .register_participant(payload.event_id, payload.participant_id)
        .await
    {
        Ok(registration) => (
            StatusCode::CREATED,
            Json(RegistrationResponse::from(registration)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// handler function for registering the authenticated caller
///
/// The caller becomes a participant on first registration.
async fn register_self<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    headers: HeaderMap,
    Json(payload): Json<RegisterSelfRequest>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    let identity = match authenticate(&headers, state.identity_verifier.as_ref()) {
        Ok(identity) => identity,
        Err(e) => return error_response(e),
    };

    if let Err(e) = state
        .registration_service
        .authorize_self_registration(payload.event_id, identity.user_id)
        .await
    {
        return error_response(e);
    }

    let new_participant = match NewParticipant::new(
        identity.first_name,
        identity.last_name,
        identity.email,
        identity.phone,
    ) {
        Ok(participant) => participant,
        Err(e) => return error_response(e),
    };

    let participant = match state
        .participant_service
        .find_or_create(new_participant)
        .await
    {
        Ok(participant) => participant,
        Err(e) => return error_response(e),
    };

    match state
        .registration_service
        .register_participant(payload.event_id, participant.id())
        .await
    {
        Ok(registration) => {
            let mut response = RegistrationResponse::from(registration);
            response.participant = Some(participant.into());
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// handler function for a single registration
async fn get_registration<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    Path(id): Path<RegistrationId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    match state.registration_service.get_registration(id).await {
        Ok(Some(registration)) => {
            (StatusCode::OK, Json(RegistrationResponse::from(registration))).into_response()
        }
        Ok(None) => not_found(format!("Registration with id {id} not found")),
        Err(e) => error_response(e),
    }
}

/// handler function for the organizer's view of an event's registrations
async fn get_event_registrations<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    let identity = match authenticate(&headers, state.identity_verifier.as_ref()) {
        Ok(identity) => identity,
        Err(e) => return error_response(e),
    };

    match state
        .registration_service
        .get_organizer_event_registrations(event_id, identity.user_id)
        .await
    {
        Ok(registrations) => list_response(registrations),
        Err(e) => error_response(e),
    }
}

async fn get_waiting_list<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    Path(event_id): Path<EventId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    match state.registration_service.get_waiting_list(event_id).await {
        Ok(registrations) => list_response(registrations),
        Err(e) => error_response(e),
    }
}

/// handler function for checking the caller's registration for an event
async fn check_registration<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    let identity = match authenticate(&headers, state.identity_verifier.as_ref()) {
        Ok(identity) => identity,
        Err(e) => return error_response(e),
    };

    let participant = match state.participant_service.find_by_email(&identity.email).await {
        Ok(participant) => participant,
        Err(e) => return error_response(e),
    };

    let registration = match participant {
        Some(participant) => {
            match state
                .registration_service
                .check_registration(event_id, participant.id())
                .await
            {
                Ok(registration) => registration,
                Err(e) => return error_response(e),
            }
        }
        None => None,
    };

    let response = match registration {
        Some(registration) => CheckRegistrationResponse {
            is_registered: true,
            registration_id: Some(registration.id()),
            status: Some(registration.status()),
            waiting_position: registration.waiting_position(),
        },
        None => CheckRegistrationResponse {
            is_registered: false,
            registration_id: None,
            status: None,
            waiting_position: None,
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// handler function for the caller's active registrations
async fn my_registrations<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    headers: HeaderMap,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    let identity = match authenticate(&headers, state.identity_verifier.as_ref()) {
        Ok(identity) => identity,
        Err(e) => return error_response(e),
    };

    let participant = match state.participant_service.find_by_email(&identity.email).await {
        Ok(Some(participant)) => participant,
        // never registered for anything
        Ok(None) => return list_response(Vec::new()),
        Err(e) => return error_response(e),
    };

    match state
        .registration_service
        .get_participant_registrations(participant.id())
        .await
    {
        Ok(registrations) => {
            let body: Vec<RegistrationResponse> = registrations
                .into_iter()
                .map(|registration| {
                    let mut response = RegistrationResponse::from(registration);
                    response.participant = Some(participant.clone().into());
                    response
                })
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn check_in<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    Path(id): Path<RegistrationId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    match state.registration_service.check_in_participant(id).await {
        Ok(true) => message("Participant checked in"),
        Ok(false) => not_found(format!("Registration with id {id} not found")),
        Err(e) => error_response(e),
    }
}

async fn cancel<E, P, R, M, V>(
    State(state): RegistrationState<E, P, R, M, V>,
    Path(id): Path<RegistrationId>,
) -> Response
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
    V: IdentityVerifier,
{
    match state.registration_service.cancel_registration(id).await {
        Ok(true) => message("Registration cancelled"),
        Ok(false) => not_found(format!("Registration with id {id} not found")),
        Err(e) => error_response(e),
    }
}

fn list_response(registrations: Vec<Registration>) -> Response {
    let body: Vec<RegistrationResponse> = registrations.into_iter().map(Into::into).collect();
    (StatusCode::OK, Json(body)).into_response()
}

fn message(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}
