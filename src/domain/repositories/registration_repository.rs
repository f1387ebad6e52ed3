use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::{
        event::EventId,
        participant::ParticipantId,
        registration::{NewRegistration, Registration, RegistrationId},
    },
};

/// The registration ledger.
///
/// Rows are never deleted; cancellation is stored as a status.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn find_by_id(&self, id: RegistrationId) -> Result<Option<Registration>, RepositoryError>;

    /// The non-cancelled registration of a participant for an event, if any.
    async fn find_active(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
    ) -> Result<Option<Registration>, RepositoryError>;

    /// Number of registrations holding a seat (`registered` or `checked_in`).
    async fn count_occupying(&self, event_id: EventId) -> Result<u64, RepositoryError>;

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError>;

    /// Waiting registrations of an event in promotion order
    /// (`registered_at` ascending, id ascending).
    async fn find_waiting(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError>;

    async fn find_active_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<Registration>, RepositoryError>;

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError>;

    /// Persist every given registration in a single transaction.
    async fn update_all(&self, registrations: &[Registration]) -> Result<(), RepositoryError>;
}
