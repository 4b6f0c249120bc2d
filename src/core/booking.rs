//! Booking business logic - submission, listing and staff edits.
//!
//! A booking is written together with its order-item snapshots in one
//! transaction. Totals are always computed here from the line items; values a
//! client might send are never trusted.

use crate::{
    core::{
        message::CurrencyFormat,
        order::LineItem,
        pricing::{self, OrderTotals, PricingConfig},
        wizard::{self, CustomerData},
    },
    entities::{Booking, BookingStatus, OrderItem, booking, order_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// A booking with its order items, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    /// The booking row
    #[serde(flatten)]
    pub booking: booking::Model,
    /// Snapshotted order lines
    pub order_items: Vec<order_item::Model>,
}

/// Everything needed to store a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Customer fields from the first wizard step
    pub customer: CustomerData,
    /// Line items from the cart
    pub items: Vec<LineItem>,
    /// Reference returned by the upload sink
    pub payment_proof: Option<String>,
}

/// Partial staff edit of a booking. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    /// New lifecycle status
    pub status: Option<BookingStatus>,
    /// New customer name
    pub customer_name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New Instagram handle; an empty string clears it
    pub instagram: Option<String>,
    /// New date, `YYYY-MM-DD`
    pub booking_date: Option<String>,
    /// New party size
    pub pax: Option<i32>,
    /// New seating
    pub seating: Option<String>,
    /// New payment proof reference
    pub payment_proof: Option<String>,
    /// Replacement order; replaces every stored line and recomputes totals
    pub items: Option<Vec<LineItem>>,
}

/// Parses a booking date as entered (`YYYY-MM-DD`).
///
/// # Errors
/// Returns [`Error::Validation`] if the date is malformed.
pub fn parse_booking_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("Invalid booking date '{value}', expected YYYY-MM-DD")))
}

/// Checks a staff status change.
///
/// Allowed: pending → confirmed, pending → cancelled, confirmed → cancelled,
/// and re-writing the current status.
///
/// # Errors
/// Returns [`Error::InvalidStatusTransition`] for any other change.
pub fn ensure_status_transition(from: BookingStatus, to: BookingStatus) -> Result<()> {
    use BookingStatus::{Cancelled, Confirmed, Pending};

    match (from, to) {
        (a, b) if a == b => Ok(()),
        (Pending, Confirmed | Cancelled) | (Confirmed, Cancelled) => Ok(()),
        _ => Err(Error::InvalidStatusTransition {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates a booking in `pending` status with its order items.
///
/// The wizard gates are re-checked here so a direct API call cannot skip
/// them. Totals and the deposit come from the pricing engine.
///
/// # Errors
/// Returns an error if:
/// - Customer data is incomplete or the date is malformed
/// - The order is empty
/// - No payment proof is attached
/// - A database write fails (nothing is written in that case)
#[instrument(skip(db, pricing, currency, new), fields(customer = %new.customer.customer_name, lines = new.items.len()))]
pub async fn create_booking(
    db: &DatabaseConnection,
    pricing: &PricingConfig,
    currency: &CurrencyFormat,
    new: NewBooking,
) -> Result<BookingDetail> {
    let NewBooking {
        customer,
        items,
        payment_proof,
    } = new;

    if !wizard::can_advance_customer_data(&customer) {
        return Err(Error::validation(
            "Customer name, phone, booking date and at least one guest are required",
        ));
    }
    if items.is_empty() {
        return Err(Error::validation("Order must contain at least one menu item"));
    }
    if !wizard::can_submit(payment_proof.as_deref()) {
        return Err(Error::validation("Payment proof is required"));
    }
    let booking_date = parse_booking_date(&customer.booking_date)?;

    let totals = pricing::order_totals(&items, pricing);
    let seating = Some(customer.seating)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| wizard::DEFAULT_SEATING.to_string());

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let stored = booking::ActiveModel {
        customer_name: Set(customer.customer_name.trim().to_string()),
        phone: Set(customer.phone.trim().to_string()),
        instagram: Set(empty_to_none(customer.instagram)),
        booking_date: Set(booking_date),
        pax: Set(customer.pax),
        seating: Set(seating),
        total_amount: Set(totals.total),
        dp_amount: Set(totals.deposit),
        payment_proof: Set(empty_to_none(payment_proof)),
        status: Set(BookingStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let order_items = insert_order_items(&txn, stored.id, &items, currency).await?;
    txn.commit().await?;

    info!(
        booking_id = stored.id,
        total = totals.total,
        deposit = totals.deposit,
        "Booking created"
    );
    Ok(BookingDetail {
        booking: stored,
        order_items,
    })
}

async fn insert_order_items<C>(
    db: &C,
    booking_id: i64,
    items: &[LineItem],
    currency: &CurrencyFormat,
) -> Result<Vec<order_item::Model>>
where
    C: ConnectionTrait,
{
    let mut stored = Vec::with_capacity(items.len());
    for item in items {
        let model = order_item::ActiveModel {
            booking_id: Set(booking_id),
            menu_id: Set(item.menu_id),
            menu_name: Set(item.menu_name.clone()),
            quantity: Set(i32::try_from(item.quantity)?),
            selected_options: Set(item.selections.describe(currency)),
            subtotal: Set(item.subtotal),
            ..Default::default()
        }
        .insert(db)
        .await?;
        stored.push(model);
    }
    Ok(stored)
}

async fn load_order_items<C>(db: &C, booking_ids: Vec<i64>) -> Result<HashMap<i64, Vec<order_item::Model>>>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<i64, Vec<order_item::Model>> = HashMap::new();
    if booking_ids.is_empty() {
        return Ok(grouped);
    }

    for item in OrderItem::find()
        .filter(order_item::Column::BookingId.is_in(booking_ids))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await?
    {
        grouped.entry(item.booking_id).or_default().push(item);
    }
    Ok(grouped)
}

/// Lists bookings newest first, optionally filtered by status.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_bookings(
    db: &DatabaseConnection,
    status: Option<BookingStatus>,
) -> Result<Vec<BookingDetail>> {
    let mut query = Booking::find();
    if let Some(status) = status {
        query = query.filter(booking::Column::Status.eq(status));
    }
    let bookings = query
        .order_by_desc(booking::Column::CreatedAt)
        .order_by_desc(booking::Column::Id)
        .all(db)
        .await?;

    let mut items = load_order_items(db, bookings.iter().map(|b| b.id).collect()).await?;
    Ok(bookings
        .into_iter()
        .map(|booking| BookingDetail {
            order_items: items.remove(&booking.id).unwrap_or_default(),
            booking,
        })
        .collect())
}

/// Retrieves a booking with its order items.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_booking_detail<C>(db: &C, booking_id: i64) -> Result<Option<BookingDetail>>
where
    C: ConnectionTrait,
{
    let Some(booking) = Booking::find_by_id(booking_id).one(db).await? else {
        return Ok(None);
    };
    let order_items = load_order_items(db, vec![booking_id])
        .await?
        .remove(&booking_id)
        .unwrap_or_default();
    Ok(Some(BookingDetail {
        booking,
        order_items,
    }))
}

/// Applies a partial staff edit.
///
/// A status change must follow [`ensure_status_transition`]. When `items` is
/// given, all stored order lines are deleted and the new ones inserted, and
/// total and deposit are recomputed; everything happens in one transaction.
///
/// # Errors
/// Returns an error if:
/// - The booking does not exist
/// - The status change is not allowed
/// - A replaced field is empty or malformed, or the replacement order is empty
/// - A database write fails (nothing is written in that case)
#[instrument(skip(db, pricing, currency, update))]
pub async fn update_booking(
    db: &DatabaseConnection,
    pricing: &PricingConfig,
    currency: &CurrencyFormat,
    booking_id: i64,
    update: BookingUpdate,
) -> Result<BookingDetail> {
    let txn = db.begin().await?;
    let current = Booking::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or(Error::BookingNotFound { id: booking_id })?;
    let current_status = current.status;
    let mut active: booking::ActiveModel = current.into();

    if let Some(status) = update.status {
        ensure_status_transition(current_status, status)?;
        active.status = Set(status);
    }
    if let Some(name) = update.customer_name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Customer name cannot be empty"));
        }
        active.customer_name = Set(name);
    }
    if let Some(phone) = update.phone {
        let phone = phone.trim().to_string();
        if phone.is_empty() {
            return Err(Error::validation("Phone cannot be empty"));
        }
        active.phone = Set(phone);
    }
    if let Some(instagram) = update.instagram {
        active.instagram = Set(empty_to_none(Some(instagram)));
    }
    if let Some(date) = update.booking_date {
        active.booking_date = Set(parse_booking_date(&date)?);
    }
    if let Some(pax) = update.pax {
        if pax < 1 {
            return Err(Error::validation("Party size must be at least 1"));
        }
        active.pax = Set(pax);
    }
    if let Some(seating) = update.seating {
        active.seating = Set(seating.trim().to_string());
    }
    if let Some(proof) = update.payment_proof {
        active.payment_proof = Set(empty_to_none(Some(proof)));
    }

    if let Some(items) = update.items {
        if items.is_empty() {
            return Err(Error::validation("Order must contain at least one menu item"));
        }
        OrderItem::delete_many()
            .filter(order_item::Column::BookingId.eq(booking_id))
            .exec(&txn)
            .await?;
        insert_order_items(&txn, booking_id, &items, currency).await?;

        let OrderTotals { total, deposit, .. } = pricing::order_totals(&items, pricing);
        active.total_amount = Set(total);
        active.dp_amount = Set(deposit);
    }

    active.updated_at = Set(chrono::Utc::now());
    active.update(&txn).await?;

    let detail = get_booking_detail(&txn, booking_id)
        .await?
        .ok_or(Error::BookingNotFound { id: booking_id })?;
    txn.commit().await?;

    if update.status.is_some_and(|s| s != current_status) {
        info!(booking_id, from = %current_status, to = %detail.booking.status, "Booking status changed");
    } else {
        info!(booking_id, "Booking updated");
    }
    Ok(detail)
}

/// Deletes a booking and its order items.
///
/// # Errors
/// Returns an error if the booking does not exist or the delete fails.
#[instrument(skip(db))]
pub async fn delete_booking(db: &DatabaseConnection, booking_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let Some(booking) = Booking::find_by_id(booking_id).one(&txn).await? else {
        warn!(booking_id, "Attempted to delete missing booking");
        return Err(Error::BookingNotFound { id: booking_id });
    };

    OrderItem::delete_many()
        .filter(order_item::Column::BookingId.eq(booking_id))
        .exec(&txn)
        .await?;
    Booking::delete_by_id(booking.id).exec(&txn).await?;
    txn.commit().await?;

    info!(booking_id, "Booking deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_status_transitions() {
        use BookingStatus::{Cancelled, Confirmed, Pending};

        assert!(ensure_status_transition(Pending, Confirmed).is_ok());
        assert!(ensure_status_transition(Pending, Cancelled).is_ok());
        assert!(ensure_status_transition(Confirmed, Cancelled).is_ok());
        assert!(ensure_status_transition(Confirmed, Confirmed).is_ok());

        assert!(matches!(
            ensure_status_transition(Cancelled, Pending),
            Err(Error::InvalidStatusTransition { .. })
        ));
        assert!(ensure_status_transition(Cancelled, Confirmed).is_err());
        assert!(ensure_status_transition(Confirmed, Pending).is_err());
    }

    #[test]
    fn test_parse_booking_date() {
        assert_eq!(
            parse_booking_date("2025-03-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
        assert!(matches!(
            parse_booking_date("10/03/2025"),
            Err(Error::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_booking_requires_gates() -> Result<()> {
        let db = setup_test_db().await?;
        let pricing = PricingConfig::default();
        let currency = CurrencyFormat::default();

        let mut new = test_new_booking(Vec::new());
        let result = create_booking(&db, &pricing, &currency, new.clone()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        new.items = vec![test_line_item(1, "Es Teh", 8000, 1)];
        new.payment_proof = None;
        let result = create_booking(&db, &pricing, &currency, new.clone()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        new.payment_proof = Some("/uploads/proof.jpg".to_string());
        new.customer.phone = String::new();
        let result = create_booking(&db, &pricing, &currency, new).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_computes_totals() -> Result<()> {
        let (db, menu) = setup_with_menu().await?;
        let cart = test_cart_for(&menu)?;

        let detail = create_booking(
            &db,
            &PricingConfig::default(),
            &CurrencyFormat::default(),
            test_new_booking(cart.into_items()),
        )
        .await?;

        assert_eq!(detail.booking.status, BookingStatus::Pending);
        assert_eq!(detail.booking.total_amount, 110_000);
        assert_eq!(detail.booking.dp_amount, 55_000);
        assert_eq!(detail.order_items.len(), 1);
        assert_eq!(detail.order_items[0].quantity, 2);
        assert_eq!(detail.order_items[0].subtotal, 100_000);
        assert_eq!(
            detail.order_items[0].selected_options.as_deref(),
            Some("Pilihan Bagian Ayam: Dada (+Rp 5.000), Pilihan Sambal: Sambal Terasi")
        );

        let loaded = get_booking_detail(&db, detail.booking.id).await?.unwrap();
        assert_eq!(loaded, detail);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_rejects_bad_date() -> Result<()> {
        let db = setup_test_db().await?;
        let mut new = test_new_booking(vec![test_line_item(1, "Es Teh", 8000, 1)]);
        new.customer.booking_date = "besok".to_string();

        let result = create_booking(&db, &PricingConfig::default(), &CurrencyFormat::default(), new).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(list_bookings(&db, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_bookings_newest_first_with_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_booking(&db, "Budi").await?;
        let second = create_test_booking(&db, "Siti").await?;

        let all = list_bookings(&db, None).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].booking.id, second.booking.id);
        assert_eq!(all[1].order_items.len(), 1);

        update_booking(
            &db,
            &PricingConfig::default(),
            &CurrencyFormat::default(),
            first.booking.id,
            BookingUpdate {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .await?;

        let confirmed = list_bookings(&db, Some(BookingStatus::Confirmed)).await?;
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].booking.customer_name, "Budi");
        assert_eq!(list_bookings(&db, Some(BookingStatus::Pending)).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_booking_status_machine() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_booking(&db, "Budi").await?;
        let pricing = PricingConfig::default();
        let currency = CurrencyFormat::default();
        let status = |status| BookingUpdate {
            status: Some(status),
            ..Default::default()
        };

        let cancelled = update_booking(&db, &pricing, &currency, created.booking.id, status(BookingStatus::Cancelled)).await?;
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);

        let result = update_booking(&db, &pricing, &currency, created.booking.id, status(BookingStatus::Confirmed)).await;
        assert!(matches!(result, Err(Error::InvalidStatusTransition { .. })));

        let unchanged = get_booking_detail(&db, created.booking.id).await?.unwrap();
        assert_eq!(unchanged.booking.status, BookingStatus::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_booking_replaces_items_and_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_booking(&db, "Budi").await?;

        let update = BookingUpdate {
            pax: Some(6),
            instagram: Some(String::new()),
            items: Some(vec![
                test_line_item(10, "Es Teh", 8000, 3),
                test_line_item(11, "Kolak", 12000, 1),
            ]),
            ..Default::default()
        };
        let updated = update_booking(
            &db,
            &PricingConfig::without_tax(),
            &CurrencyFormat::default(),
            created.booking.id,
            update,
        )
        .await?;

        assert_eq!(updated.booking.pax, 6);
        assert!(updated.booking.instagram.is_none());
        assert_eq!(updated.order_items.len(), 2);
        assert_eq!(updated.booking.total_amount, 36_000);
        assert_eq!(updated.booking.dp_amount, 18_000);
        assert_eq!(OrderItem::find().all(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_booking_validation_leaves_row_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_booking(&db, "Budi").await?;

        let update = BookingUpdate {
            customer_name: Some("Andi".to_string()),
            pax: Some(0),
            ..Default::default()
        };
        let result = update_booking(
            &db,
            &PricingConfig::default(),
            &CurrencyFormat::default(),
            created.booking.id,
            update,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let reloaded = get_booking_detail(&db, created.booking.id).await?.unwrap();
        assert_eq!(reloaded.booking.customer_name, "Budi");

        let missing = update_booking(
            &db,
            &PricingConfig::default(),
            &CurrencyFormat::default(),
            9999,
            BookingUpdate::default(),
        )
        .await;
        assert!(matches!(missing, Err(Error::BookingNotFound { id: 9999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_booking() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_booking(&db, "Budi").await?;

        delete_booking(&db, created.booking.id).await?;
        assert!(get_booking_detail(&db, created.booking.id).await?.is_none());
        assert!(OrderItem::find().all(&db).await?.is_empty());

        let result = delete_booking(&db, created.booking.id).await;
        assert!(matches!(result, Err(Error::BookingNotFound { .. })));
        Ok(())
    }
}
