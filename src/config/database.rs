//! Database configuration module.
//!
//! Handles the connection and creates all tables from the entity definitions
//! with `SeaORM`'s `Schema::create_table_from_entity`, so the schema always
//! matches the Rust structs without hand-written SQL. Tables are created with
//! `IF NOT EXISTS`; there are no versioned migrations.

use crate::{
    config::AppConfig,
    core::{category, seating},
    entities::{Booking, Category, MenuItem, MenuVariant, OrderItem, SeatingSpot, VariantOption},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{info, instrument};

/// Reads the required `DATABASE_URL` environment variable.
///
/// # Errors
/// Returns [`Error::Config`] if the variable is missing or empty.
pub fn get_database_url() -> Result<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| Error::config("DATABASE_URL must be set"))
}

/// Connects to the database at `database_url` (e.g. `sqlite://data/iftar.sqlite?mode=rwc`).
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table that does not exist yet, parents before children.
///
/// # Errors
/// Returns an error if a statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Category).await?;
    create_table(db, &schema, MenuItem).await?;
    create_table(db, &schema, MenuVariant).await?;
    create_table(db, &schema, VariantOption).await?;
    create_table(db, &schema, SeatingSpot).await?;
    create_table(db, &schema, Booking).await?;
    create_table(db, &schema, OrderItem).await?;

    Ok(())
}

/// Creates the categories and seating spots listed in the configuration
/// that are not in the database yet.
///
/// # Errors
/// Returns an error if a database operation fails.
#[instrument(skip_all)]
pub async fn seed_initial_data(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    let categories = category::seed_categories(db, &config.categories).await?;
    let spots = seating::seed_seating_spots(db, &config.seating).await?;
    info!(categories, spots, "Seed data applied");
    Ok(())
}
