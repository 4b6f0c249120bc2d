//! Booking entity - A submitted iftar reservation.
//!
//! Totals are computed by the pricing engine at submission time and stored
//! alongside the customer's data. Order lines are snapshots in
//! [`super::order_item`], so menu changes never alter a past booking.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Submitted, awaiting verification of the deposit
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Deposit verified by staff
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Cancelled by staff
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Lowercase wire name, same as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the person booking
    pub customer_name: String,
    /// Customer's WhatsApp number as entered
    pub phone: String,
    /// Optional Instagram handle
    pub instagram: Option<String>,
    /// Date of the iftar
    pub booking_date: Date,
    /// Party size
    pub pax: i32,
    /// Chosen seating (spot name or free text)
    pub seating: String,
    /// Order total including tax when enabled
    pub total_amount: i64,
    /// Required deposit (50% of total, rounded up)
    pub dp_amount: i64,
    /// Stored payment proof path or URL
    pub payment_proof: Option<String>,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// When the booking was submitted
    pub created_at: DateTimeUtc,
    /// When the booking was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One booking has many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
