//! Admin credentials and token signing settings from environment variables.
//!
//! `ADMIN_USERNAME` (default `admin`), then `ADMIN_PASSWORD_HASH` (argon2 PHC
//! string) or, failing that, `ADMIN_PASSWORD` hashed at startup.
//! `JWT_SECRET` is required.

use crate::{
    core::auth::{AdminCredentials, TokenService},
    errors::{Error, Result},
};
use tracing::{info, warn};

/// Username used when `ADMIN_USERNAME` is not set.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Builds admin credentials from a variable lookup.
///
/// # Errors
/// Returns [`Error::Config`] if neither password variable is set or the hash
/// is malformed.
pub fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AdminCredentials> {
    let username =
        non_empty(&lookup, "ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());

    if let Some(hash) = non_empty(&lookup, "ADMIN_PASSWORD_HASH") {
        return AdminCredentials::from_hash(username, hash);
    }
    if let Some(password) = non_empty(&lookup, "ADMIN_PASSWORD") {
        warn!("ADMIN_PASSWORD is set in plain text; prefer ADMIN_PASSWORD_HASH");
        return AdminCredentials::from_plain(username, &password);
    }
    Err(Error::config(
        "Either ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set",
    ))
}

/// Builds the token service from a variable lookup.
///
/// # Errors
/// Returns [`Error::Config`] if `JWT_SECRET` is missing or too short.
pub fn token_service_from(
    lookup: impl Fn(&str) -> Option<String>,
    lifetime_minutes: i64,
) -> Result<TokenService> {
    let secret =
        non_empty(&lookup, "JWT_SECRET").ok_or_else(|| Error::config("JWT_SECRET must be set"))?;
    TokenService::new(secret.as_bytes(), lifetime_minutes)
}

/// Admin credentials from the process environment.
///
/// # Errors
/// See [`credentials_from`].
pub fn load_admin_credentials() -> Result<AdminCredentials> {
    let credentials = credentials_from(|key| std::env::var(key).ok())?;
    info!(username = %credentials.username, "Admin credentials loaded");
    Ok(credentials)
}

/// Token service from the process environment.
///
/// # Errors
/// See [`token_service_from`].
pub fn load_token_service(lifetime_minutes: i64) -> Result<TokenService> {
    token_service_from(|key| std::env::var(key).ok(), lifetime_minutes)
}
