//! Booking endpoints: public submission and staff management.
//!
//! Clients send menu ids, option names and quantities only. The cart is
//! rebuilt from the stored menu and all money figures are computed here.

use crate::{
    api::ApiState,
    core::{
        booking::{self, BookingDetail, BookingUpdate, NewBooking},
        message::{self, BookingSummary},
        order::{self, OrderItemRequest},
        wizard::CustomerData,
    },
    entities::BookingStatus,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

/// Body of `POST /api/bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Customer fields
    #[serde(flatten)]
    pub customer: CustomerData,
    /// Ordered items
    #[serde(default, alias = "orderItems")]
    pub items: Vec<OrderItemRequest>,
    /// Reference returned by `POST /api/upload`
    #[serde(default)]
    pub payment_proof: Option<String>,
}

/// Body of `PUT /api/bookings/{id}`; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    /// New status
    pub status: Option<BookingStatus>,
    /// New customer name
    pub customer_name: Option<String>,
    /// New phone
    pub phone: Option<String>,
    /// New Instagram handle, empty clears it
    pub instagram: Option<String>,
    /// New date, `YYYY-MM-DD`
    pub booking_date: Option<String>,
    /// New party size
    pub pax: Option<i32>,
    /// New seating
    pub seating: Option<String>,
    /// New payment proof reference
    pub payment_proof: Option<String>,
    /// Replacement order
    #[serde(alias = "orderItems")]
    pub items: Option<Vec<OrderItemRequest>>,
}

/// Query of `GET /api/bookings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only bookings in this status
    pub status: Option<BookingStatus>,
}

/// Message text and deep link for a booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingMessage {
    /// Formatted message
    pub message: String,
    /// Messaging deep link carrying the message
    pub whatsapp_link: String,
}

/// Response of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBooking {
    /// The stored booking
    pub booking: BookingDetail,
    /// Message to hand off to the restaurant
    #[serde(flatten)]
    pub message: BookingMessage,
}

/// Routes anyone may call.
pub fn public_routes() -> Router<ApiState> {
    Router::new().route("/api/bookings", post(create_booking))
}

/// Routes behind the admin guard.
pub fn admin_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/bookings", get(list_bookings))
        .route(
            "/api/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/api/bookings/{id}/message", get(booking_message))
}

fn render_message(state: &ApiState, detail: &BookingDetail) -> BookingMessage {
    let restaurant = &state.config.restaurant;
    let summary = BookingSummary::from_booking(detail, &restaurant.public_base_url);
    let text = message::format_booking_message(&summary, &state.config.currency);
    BookingMessage {
        whatsapp_link: message::generate_link(
            &restaurant.messaging_base_url,
            &restaurant.whatsapp_number,
            &text,
        ),
        message: text,
    }
}

async fn create_booking(
    State(state): State<ApiState>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreatedBooking>)> {
    let cart = order::build_cart(&state.database, &body.items).await?;
    let detail = booking::create_booking(
        &state.database,
        &state.config.pricing,
        &state.config.currency,
        NewBooking {
            customer: body.customer,
            items: cart.into_items(),
            payment_proof: body.payment_proof,
        },
    )
    .await?;

    let message = render_message(&state, &detail);
    info!(booking_id = detail.booking.id, "Booking submitted");
    Ok((
        StatusCode::CREATED,
        Json(CreatedBooking {
            booking: detail,
            message,
        }),
    ))
}

async fn list_bookings(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingDetail>>> {
    Ok(Json(
        booking::list_bookings(&state.database, query.status).await?,
    ))
}

async fn get_booking(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<BookingDetail>> {
    booking::get_booking_detail(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::BookingNotFound { id })
}

async fn update_booking(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<BookingDetail>> {
    let items = match &body.items {
        Some(requests) => Some(order::build_cart(&state.database, requests).await?.into_items()),
        None => None,
    };

    let update = BookingUpdate {
        status: body.status,
        customer_name: body.customer_name,
        phone: body.phone,
        instagram: body.instagram,
        booking_date: body.booking_date,
        pax: body.pax,
        seating: body.seating,
        payment_proof: body.payment_proof,
        items,
    };
    let detail = booking::update_booking(
        &state.database,
        &state.config.pricing,
        &state.config.currency,
        id,
        update,
    )
    .await?;
    Ok(Json(detail))
}

async fn delete_booking(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    booking::delete_booking(&state.database, id).await?;
    Ok(Json(json!({ "message": "Booking deleted successfully" })))
}

async fn booking_message(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<BookingMessage>> {
    let detail = booking::get_booking_detail(&state.database, id)
        .await?
        .ok_or(Error::BookingNotFound { id })?;
    Ok(Json(render_message(&state, &detail)))
}
