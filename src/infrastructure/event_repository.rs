use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::{
    domain::{
        error::RepositoryError,
        models::event::{EventCapacity, EventId},
        repositories::event_repository::EventRepository,
    },
    entity::events,
};

#[derive(Clone)]
pub struct PostgresEventRepository {
    db: DatabaseConnection,
}

impl PostgresEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn find_capacity(&self, id: EventId) -> Result<Option<EventCapacity>, RepositoryError> {
        let event = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        match event {
            Some(model) => {
                let max_participants = u32::try_from(model.max_participants).map_err(|_| {
                    RepositoryError::DatabaseError(format!(
                        "event {} has negative max_participants",
                        model.id
                    ))
                })?;
                Ok(Some(EventCapacity::new(
                    max_participants,
                    model.created_by_user_id,
                )))
            }
            None => Ok(None),
        }
    }
}
