//! Variant option entity - One concrete choice within a variant.
//!
//! `price` is a signed delta applied on top of the menu item's base price;
//! negative values are discounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant option database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variant_options")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the option
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Variant this option belongs to
    pub variant_id: i64,
    /// Display name (e.g., "Sambal Ijo")
    pub name: String,
    /// Price delta, may be negative, zero or positive
    pub price: i64,
}

/// Defines relationships between VariantOption and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one variant
    #[sea_orm(
        belongs_to = "super::menu_variant::Entity",
        from = "Column::VariantId",
        to = "super::menu_variant::Column::Id"
    )]
    Variant,
}

impl Related<super::menu_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
