use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            event::EventId,
            participant::ParticipantId,
            registration::{NewRegistration, Registration, RegistrationId, RegistrationStatus},
        },
        repositories::registration_repository::RegistrationRepository,
    },
    entity::registrations,
};

#[derive(Clone)]
pub struct PostgresRegistrationRepository {
    db: DatabaseConnection,
}

impl PostgresRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_many(
        &self,
        query: sea_orm::Select<registrations::Entity>,
    ) -> Result<Vec<Registration>, RepositoryError> {
        query
            .all(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}

fn to_domain(model: registrations::Model) -> Result<Registration, RepositoryError> {
    let status = RegistrationStatus::from_str(&model.status)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(Registration::reconstruct(
        model.id,
        model.event_id,
        model.participant_id,
        status,
        model.registered_at.naive_utc().and_utc(),
        model.cancelled_at.map(|t| t.naive_utc().and_utc()),
        model.checked_in_at.map(|t| t.naive_utc().and_utc()),
        model.waiting_position,
    ))
}

fn active_statuses() -> Vec<&'static str> {
    [
        RegistrationStatus::Registered,
        RegistrationStatus::Waiting,
        RegistrationStatus::CheckedIn,
    ]
    .iter()
    .map(RegistrationStatus::as_str)
    .collect()
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn find_by_id(&self, id: RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        registrations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .map(to_domain)
            .transpose()
    }

    async fn find_active(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
    ) -> Result<Option<Registration>, RepositoryError> {
        registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .filter(registrations::Column::ParticipantId.eq(participant_id))
            .filter(registrations::Column::Status.is_in(active_statuses()))
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .map(to_domain)
            .transpose()
    }

    async fn count_occupying(&self, event_id: EventId) -> Result<u64, RepositoryError> {
        registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .filter(
                registrations::Column::Status
                    .is_in(RegistrationStatus::OCCUPYING.iter().map(RegistrationStatus::as_str)),
            )
            .count(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
    }

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError> {
        self.find_many(
            registrations::Entity::find()
                .filter(registrations::Column::EventId.eq(event_id))
                .order_by_asc(registrations::Column::Id),
        )
        .await
    }

    async fn find_waiting(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError> {
        self.find_many(
            registrations::Entity::find()
                .filter(registrations::Column::EventId.eq(event_id))
                .filter(registrations::Column::Status.eq(RegistrationStatus::Waiting.as_str()))
                .order_by_asc(registrations::Column::RegisteredAt)
                .order_by_asc(registrations::Column::Id),
        )
        .await
    }

    async fn find_active_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<Registration>, RepositoryError> {
        self.find_many(
            registrations::Entity::find()
                .filter(registrations::Column::ParticipantId.eq(participant_id))
                .filter(registrations::Column::Status.is_in(active_statuses()))
                .order_by_asc(registrations::Column::RegisteredAt),
        )
        .await
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError> {
        let model = registrations::ActiveModel {
            id: NotSet,
            event_id: Set(registration.event_id()),
            participant_id: Set(registration.participant_id()),
            status: Set(registration.status().as_str().to_string()),
            registered_at: Set(registration.registered_at().fixed_offset()),
            cancelled_at: Set(None),
            checked_in_at: Set(None),
            waiting_position: Set(registration.waiting_position()),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Registration::from_new(inserted.id, registration))
    }

    async fn update_all(&self, changed: &[Registration]) -> Result<(), RepositoryError> {
        // Begin transaction
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for registration in changed {
            let model = registrations::ActiveModel {
                id: Unchanged(registration.id()),
                event_id: Set(registration.event_id()),
                participant_id: Set(registration.participant_id()),
                status: Set(registration.status().as_str().to_string()),
                registered_at: Set(registration.registered_at().fixed_offset()),
                cancelled_at: Set(registration.cancelled_at().map(|t| t.fixed_offset())),
                checked_in_at: Set(registration.checked_in_at().map(|t| t.fixed_offset())),
                waiting_position: Set(registration.waiting_position()),
            };

            model.update(&txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => RepositoryError::NotFound,
                other => RepositoryError::DatabaseError(other.to_string()),
            })?;
        }

        // Commit transaction
        txn.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
