use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::event::{EventCapacity, EventId},
};

/// Read-only access to events. Events are owned by another part of the system.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_capacity(&self, id: EventId) -> Result<Option<EventCapacity>, RepositoryError>;
}
