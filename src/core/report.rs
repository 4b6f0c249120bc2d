//! Dashboard statistics over stored bookings.
//!
//! Numbers only; presentation (cards, charts) belongs to the client.

use crate::{
    entities::{Booking, BookingStatus, booking},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;

/// How many of the newest bookings the dashboard shows.
pub const RECENT_BOOKINGS: usize = 5;

/// Summary numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    /// All bookings, any status
    pub total_bookings: usize,
    /// Awaiting deposit verification
    pub pending_bookings: usize,
    /// Deposit verified
    pub confirmed_bookings: usize,
    /// Cancelled by staff
    pub cancelled_bookings: usize,
    /// Sum of order totals of bookings that are not cancelled
    pub total_revenue: i64,
    /// Sum of deposits of bookings that are not cancelled
    pub total_deposits: i64,
    /// Newest bookings first
    pub recent_bookings: Vec<booking::Model>,
}

/// Computes dashboard numbers from bookings sorted newest first.
#[must_use]
pub fn summarize(bookings: &[booking::Model]) -> BookingStats {
    let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
    let active = || bookings.iter().filter(|b| b.status != BookingStatus::Cancelled);

    BookingStats {
        total_bookings: bookings.len(),
        pending_bookings: count(BookingStatus::Pending),
        confirmed_bookings: count(BookingStatus::Confirmed),
        cancelled_bookings: count(BookingStatus::Cancelled),
        total_revenue: active().map(|b| b.total_amount).sum(),
        total_deposits: active().map(|b| b.dp_amount).sum(),
        recent_bookings: bookings.iter().take(RECENT_BOOKINGS).cloned().collect(),
    }
}

/// Loads all bookings and summarizes them.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn booking_stats(db: &DatabaseConnection) -> Result<BookingStats> {
    let bookings = Booking::find()
        .order_by_desc(booking::Column::CreatedAt)
        .order_by_desc(booking::Column::Id)
        .all(db)
        .await?;
    Ok(summarize(&bookings))
}
