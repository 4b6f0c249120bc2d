//! Seating spot business logic.
//!
//! Spots are master data managed by staff. Customers only see active spots;
//! bookings store the seating as free text, so editing or deleting a spot
//! never touches existing bookings.

use crate::{
    entities::{SeatingSpot, seating_spot},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Seating spot payload for create, update and config seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingSpotInput {
    /// Display name (e.g., "Gazebo")
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Free-text capacity (e.g., "2-10 orang")
    #[serde(default)]
    pub capacity: String,
    /// Visible to customers
    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate(input: &SeatingSpotInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Seating spot name cannot be empty"));
    }
    Ok(())
}

/// Lists seating spots by id. Inactive spots are included only on request.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_seating_spots(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<seating_spot::Model>> {
    let mut query = SeatingSpot::find();
    if !include_inactive {
        query = query.filter(seating_spot::Column::IsActive.eq(true));
    }
    Ok(query
        .order_by_asc(seating_spot::Column::Id)
        .all(db)
        .await?)
}

/// Retrieves a seating spot by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_seating_spot(
    db: &DatabaseConnection,
    spot_id: i64,
) -> Result<Option<seating_spot::Model>> {
    Ok(SeatingSpot::find_by_id(spot_id).one(db).await?)
}

/// Creates a seating spot.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_seating_spot(
    db: &DatabaseConnection,
    input: SeatingSpotInput,
) -> Result<seating_spot::Model> {
    validate(&input)?;

    let spot = seating_spot::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(clean(input.description)),
        image: Set(clean(input.image)),
        capacity: Set(input.capacity.trim().to_string()),
        is_active: Set(input.is_active),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(spot_id = spot.id, "Seating spot created");
    Ok(spot)
}

/// Replaces a seating spot's fields.
///
/// # Errors
/// Returns an error if the spot does not exist, the name is empty, or the
/// update fails.
#[instrument(skip(db, input))]
pub async fn update_seating_spot(
    db: &DatabaseConnection,
    spot_id: i64,
    input: SeatingSpotInput,
) -> Result<seating_spot::Model> {
    validate(&input)?;

    let mut spot: seating_spot::ActiveModel = get_seating_spot(db, spot_id)
        .await?
        .ok_or(Error::SeatingSpotNotFound { id: spot_id })?
        .into();

    spot.name = Set(input.name.trim().to_string());
    spot.description = Set(clean(input.description));
    spot.image = Set(clean(input.image));
    spot.capacity = Set(input.capacity.trim().to_string());
    spot.is_active = Set(input.is_active);

    let updated = spot.update(db).await?;
    info!(spot_id, is_active = updated.is_active, "Seating spot updated");
    Ok(updated)
}

/// Deletes a seating spot.
///
/// # Errors
/// Returns an error if the spot does not exist or the delete fails.
#[instrument(skip(db))]
pub async fn delete_seating_spot(db: &DatabaseConnection, spot_id: i64) -> Result<()> {
    let result = SeatingSpot::delete_by_id(spot_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SeatingSpotNotFound { id: spot_id });
    }
    info!(spot_id, "Seating spot deleted");
    Ok(())
}

/// Creates every configured spot whose name does not exist yet.
///
/// Returns how many were created.
///
/// # Errors
/// Returns an error if a database operation fails.
#[instrument(skip(db, seeds), fields(count = seeds.len()))]
pub async fn seed_seating_spots(db: &DatabaseConnection, seeds: &[SeatingSpotInput]) -> Result<usize> {
    let existing: Vec<String> = list_seating_spots(db, true)
        .await?
        .into_iter()
        .map(|spot| spot.name)
        .collect();

    let mut created = 0;
    for seed in seeds {
        if existing.iter().any(|name| name == seed.name.trim()) {
            continue;
        }
        create_seating_spot(db, seed.clone()).await?;
        created += 1;
    }
    Ok(created)
}
