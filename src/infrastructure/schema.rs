use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::entity::{events, participants, registrations};

/// Create the tables this service uses when they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, participants::Entity).await?;
    create_table(db, events::Entity).await?;
    create_table(db, registrations::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    tracing::debug!(table = entity.table_name(), "table ensured");
    Ok(())
}
