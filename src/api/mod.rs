//! HTTP API - axum routes for the public booking flow and the admin area.
//!
//! Public routes: menu, categories, active seating, booking submission,
//! uploads, login. Everything else requires an admin bearer token, checked
//! by [`auth::require_admin`].

/// Login and the admin guard
pub mod auth;
/// Booking submission and management
pub mod bookings;
/// Error → HTTP response mapping
pub mod error;
/// Health and dashboard statistics
pub mod general;
/// Menu items and categories
pub mod menu;
/// Seating spots
pub mod seating;
/// File uploads
pub mod upload;

use crate::{
    config::AppConfig,
    core::{
        auth::{AdminCredentials, TokenService},
        upload::{PUBLIC_PREFIX, UploadSink},
    },
};
use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    /// Connection pool
    pub database: DatabaseConnection,
    /// Loaded `config.toml`
    pub config: Arc<AppConfig>,
    /// The admin account
    pub credentials: Arc<AdminCredentials>,
    /// Token signing and validation
    pub tokens: Arc<TokenService>,
    /// Where uploads are written
    pub uploads: UploadSink,
}

impl ApiState {
    /// Bundles the pieces built at startup.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        config: AppConfig,
        credentials: AdminCredentials,
        tokens: TokenService,
    ) -> Self {
        let uploads = UploadSink::new(config.server.upload_dir.clone());
        Self {
            database,
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            tokens: Arc::new(tokens),
            uploads,
        }
    }
}

/// Builds the complete application router.
pub fn router(state: ApiState) -> Router {
    let admin = Router::new()
        .merge(bookings::admin_routes())
        .merge(menu::admin_routes())
        .merge(seating::admin_routes())
        .merge(general::admin_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public = Router::new()
        .merge(general::public_routes())
        .merge(menu::public_routes())
        .merge(seating::public_routes())
        .merge(bookings::public_routes())
        .merge(upload::public_routes())
        .merge(auth::router());

    Router::new()
        .merge(public)
        .merge(admin)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.uploads.dir()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
