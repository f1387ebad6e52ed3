use crate::domain::{
    error::DomainError,
    models::participant::{NewParticipant, Participant, ParticipantId},
    repositories::participant_repository::ParticipantRepository,
};

pub struct ParticipantUsecase<P: ParticipantRepository> {
    participant_repository: P,
}

impl<P: ParticipantRepository> ParticipantUsecase<P> {
    pub fn new(participant_repository: P) -> Self {
        Self {
            participant_repository,
        }
    }

    /// Look a participant up by email, creating it on first use.
    pub async fn find_or_create(&self, participant: NewParticipant) -> Result<Participant, DomainError> {
        if let Some(existing) = self
            .participant_repository
            .find_by_email(participant.email())
            .await?
        {
            return Ok(existing);
        }

        let created = self.participant_repository.create(participant).await?;
        tracing::info!(participant_id = created.id(), "participant created");
        Ok(created)
    }

    pub async fn create_participant(
        &self,
        participant: NewParticipant,
    ) -> Result<Participant, DomainError> {
        if self
            .participant_repository
            .find_by_email(participant.email())
            .await?
            .is_some()
        {
            return Err(DomainError::InvalidRegistration(format!(
                "participant with email {} already exists",
                participant.email()
            )));
        }

        let created = self.participant_repository.create(participant).await?;
        tracing::info!(participant_id = created.id(), "participant created");
        Ok(created)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError> {
        Ok(self.participant_repository.find_by_email(email).await?)
    }

    pub async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Option<Participant>, DomainError> {
        Ok(self.participant_repository.find_by_id(participant_id).await?)
    }
}
