//! Order item entity - A line of a booking, snapshotted at submission.
//!
//! `menu_id` is kept for reference only (no foreign key) and the menu name and
//! selected options are stored as plain text, so deleting or editing a menu
//! item leaves historical bookings intact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the order item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Booking this line belongs to
    pub booking_id: i64,
    /// Menu item id at the time of ordering
    pub menu_id: i64,
    /// Menu item name at the time of ordering
    pub menu_name: String,
    /// Number of portions
    pub quantity: i32,
    /// Flattened option description, e.g. "Pilihan Sambal: Sambal Ijo (+Rp 2.000)"
    pub selected_options: Option<String>,
    /// Line subtotal
    pub subtotal: i64,
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order item belongs to one booking
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
