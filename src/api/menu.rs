//! Menu and category endpoints.

use crate::{
    api::ApiState,
    core::{
        category::{self, CategoryInput},
        menu::{self, MenuItemDetail, MenuItemInput},
    },
    entities::category as category_entity,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Public menu listing.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    /// Items with category, variants and options
    pub menus: Vec<MenuItemDetail>,
    /// All categories
    pub categories: Vec<category_entity::Model>,
}

/// Routes anyone may call.
pub fn public_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/menu", get(list_menu))
        .route("/api/menu/{id}", get(get_menu_item))
        .route("/api/categories", get(list_categories))
}

/// Routes behind the admin guard.
pub fn admin_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/menu", post(create_menu_item))
        .route("/api/menu/{id}", put(update_menu_item).delete(delete_menu_item))
        .route("/api/categories", post(create_category))
}

async fn list_menu(State(state): State<ApiState>) -> Result<Json<MenuResponse>> {
    let menus = menu::get_all_menu_items(&state.database).await?;
    let categories = category::list_categories(&state.database).await?;
    Ok(Json(MenuResponse { menus, categories }))
}

async fn get_menu_item(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<MenuItemDetail>> {
    menu::get_menu_item_detail(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::MenuItemNotFound { id })
}

async fn create_menu_item(
    State(state): State<ApiState>,
    Json(input): Json<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItemDetail>)> {
    let detail = menu::create_menu_item(&state.database, input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_menu_item(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(input): Json<MenuItemInput>,
) -> Result<Json<MenuItemDetail>> {
    Ok(Json(menu::update_menu_item(&state.database, id, input).await?))
}

async fn delete_menu_item(State(state): State<ApiState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    menu::delete_menu_item(&state.database, id).await?;
    Ok(Json(json!({ "message": "Menu item deleted successfully" })))
}

async fn list_categories(State(state): State<ApiState>) -> Result<Json<Vec<category_entity::Model>>> {
    Ok(Json(category::list_categories(&state.database).await?))
}

async fn create_category(
    State(state): State<ApiState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<category_entity::Model>)> {
    let created = category::create_category(&state.database, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
