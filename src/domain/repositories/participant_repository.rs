use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::participant::{NewParticipant, Participant, ParticipantId},
};

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, RepositoryError>;
    async fn create(&self, participant: NewParticipant) -> Result<Participant, RepositoryError>;
}
