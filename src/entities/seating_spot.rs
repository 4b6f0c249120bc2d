//! Seating spot entity - A bookable area of the restaurant.
//!
//! `is_active` only controls whether customers see the spot; it has no effect
//! on the validity of existing bookings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Seating spot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seating_spots")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the spot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Outdoor Garden")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional image path or URL
    pub image: Option<String>,
    /// Free-text capacity (e.g., "2-10 orang")
    pub capacity: String,
    /// Visible to customers when true
    pub is_active: bool,
}

/// `SeatingSpot` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
