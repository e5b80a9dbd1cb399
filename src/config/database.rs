//! Database configuration module for `GiftBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{Gift, SystemState};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the `SQLite` database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions.
///
/// Table creation is idempotent via `if_not_exists`, so this runs safely on
/// every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut gift_table = schema.create_table_from_entity(Gift);
    let mut system_state_table = schema.create_table_from_entity(SystemState);

    db.execute(builder.build(gift_table.if_not_exists())).await?;
    db.execute(builder.build(system_state_table.if_not_exists()))
        .await?;

    Ok(())
}
