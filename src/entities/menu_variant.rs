//! Menu variant entity - A named customisation axis such as "Pilihan Sambal".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu variant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_variants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the variant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Menu item this variant belongs to
    pub menu_item_id: i64,
    /// Display name; also the key of a cart selection
    pub name: String,
}

/// Defines relationships between MenuVariant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each variant belongs to one menu item
    #[sea_orm(
        belongs_to = "super::menu_item::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_item::Column::Id"
    )]
    MenuItem,
    /// One variant has many options
    #[sea_orm(has_many = "super::variant_option::Entity")]
    Options,
}

impl Related<super::menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItem.def()
    }
}

impl Related<super::variant_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
