//! Menu item entity - A dish or package customers can order.
//!
//! The base price is stored in the smallest currency unit. Customisation axes
//! live in [`super::menu_variant`], each with its own priced options.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the menu item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Paket Ayam Penyet Spesial")
    pub name: String,
    /// Base price before any option deltas
    pub price: i64,
    /// Optional description shown on the menu
    pub description: Option<String>,
    /// Optional image path or URL
    pub image: Option<String>,
    /// Category this item is listed under
    pub category_id: i64,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between MenuItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu item belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One menu item has many variants
    #[sea_orm(has_many = "super::menu_variant::Entity")]
    Variants,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::menu_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
