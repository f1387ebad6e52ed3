use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::participant::{NewParticipant, Participant, ParticipantId},
        repositories::participant_repository::ParticipantRepository,
    },
    entity::participants,
};

#[derive(Clone)]
pub struct PostgresParticipantRepository {
    db: DatabaseConnection,
}

impl PostgresParticipantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: participants::Model) -> Participant {
    Participant::reconstruct(
        model.id,
        model.first_name,
        model.last_name,
        model.email,
        model.phone,
        model.created_at.naive_utc().and_utc(),
    )
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, RepositoryError> {
        let participant = participants::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(participant.map(to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, RepositoryError> {
        let participant = participants::Entity::find()
            .filter(participants::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(participant.map(to_domain))
    }

    async fn create(&self, participant: NewParticipant) -> Result<Participant, RepositoryError> {
        let model = participants::ActiveModel {
            id: NotSet,
            first_name: Set(participant.first_name().to_string()),
            last_name: Set(participant.last_name().to_string()),
            email: Set(participant.email().to_string()),
            phone: Set(participant.phone().map(str::to_string)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(to_domain(inserted))
    }
}
