//! Health check and dashboard statistics.

use crate::{
    api::ApiState,
    core::report::{self, BookingStats},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

/// Routes anyone may call.
pub fn public_routes() -> Router<ApiState> {
    Router::new().route("/api/health", get(health))
}

/// Routes behind the admin guard.
pub fn admin_routes() -> Router<ApiState> {
    Router::new().route("/api/stats", get(stats))
}

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "restaurant": state.config.restaurant.name,
    }))
}

async fn stats(State(state): State<ApiState>) -> Result<Json<BookingStats>> {
    Ok(Json(report::booking_stats(&state.database).await?))
}
