//! Admin login and the bearer-token guard for admin routes.

use crate::{
    api::ApiState,
    core::auth::{self, Claims, IssuedToken},
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
    routing::post,
};
use serde::Deserialize;
use tracing::debug;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin username
    pub username: String,
    /// Admin password
    pub password: String,
}

/// Routes under `/api/auth`.
pub fn router() -> Router<ApiState> {
    Router::new().route("/api/auth/login", post(login))
}

async fn login(State(state): State<ApiState>, Json(body): Json<LoginRequest>) -> Result<Json<IssuedToken>> {
    let issued = auth::login(&state.credentials, &state.tokens, &body.username, &body.password)?;
    Ok(Json(issued))
}

/// Validates the `Authorization: Bearer <token>` header.
///
/// # Errors
/// Returns [`Error::Unauthorized`] if the header is missing, malformed, or
/// carries an invalid or expired token.
pub fn bearer_claims(state: &ApiState, headers: &HeaderMap) -> Result<Claims> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized {
            message: "Invalid Authorization format".to_string(),
        })?;

    state.tokens.validate(token.trim())
}

/// Middleware guarding admin routes; stores the [`Claims`] as a request
/// extension.
pub async fn require_admin(
    State(state): State<ApiState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let claims = bearer_claims(&state, request.headers())?;
    debug!(admin = %claims.sub, path = %request.uri().path(), "Admin request");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
