//! Seating spot endpoints.
//!
//! `GET /api/seating` lists active spots; with `?all=true` it lists every
//! spot and then requires an admin token.

use crate::{
    api::{ApiState, auth::bearer_claims},
    core::seating::{self, SeatingSpotInput},
    entities::seating_spot,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Query of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SeatingQuery {
    /// Include inactive spots (admin only)
    #[serde(default)]
    pub all: bool,
}

/// Routes anyone may call.
pub fn public_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/seating", get(list_spots))
        .route("/api/seating/{id}", get(get_spot))
}

/// Routes behind the admin guard.
pub fn admin_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/seating", post(create_spot))
        .route("/api/seating/{id}", put(update_spot).delete(delete_spot))
}

async fn list_spots(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<SeatingQuery>,
) -> Result<Json<Vec<seating_spot::Model>>> {
    if query.all {
        bearer_claims(&state, &headers)?;
    }
    Ok(Json(
        seating::list_seating_spots(&state.database, query.all).await?,
    ))
}

async fn get_spot(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<seating_spot::Model>> {
    seating::get_seating_spot(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::SeatingSpotNotFound { id })
}

async fn create_spot(
    State(state): State<ApiState>,
    Json(input): Json<SeatingSpotInput>,
) -> Result<(StatusCode, Json<seating_spot::Model>)> {
    let spot = seating::create_seating_spot(&state.database, input).await?;
    Ok((StatusCode::CREATED, Json(spot)))
}

async fn update_spot(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(input): Json<SeatingSpotInput>,
) -> Result<Json<seating_spot::Model>> {
    Ok(Json(
        seating::update_seating_spot(&state.database, id, input).await?,
    ))
}

async fn delete_spot(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    seating::delete_seating_spot(&state.database, id).await?;
    Ok(Json(json!({ "message": "Seating spot deleted successfully" })))
}
