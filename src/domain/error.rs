use thiserror::Error;

use crate::domain::models::{event::EventId, participant::ParticipantId};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Event with id {0} not found")]
    EventNotFound(EventId),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Participant {participant_id} is already registered for event {event_id}")]
    ParticipantAlreadyRegistered {
        event_id: EventId,
        participant_id: ParticipantId,
    },

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
