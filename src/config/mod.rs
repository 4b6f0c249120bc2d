//! Application configuration loaded from `config.toml`.
//!
//! Secrets (database URL, signing secret, admin password) come from the
//! environment instead; see [`database`] and [`admin`].

/// Admin credentials and token settings from environment variables
pub mod admin;
/// Database configuration and connection management
pub mod database;

use crate::{
    core::{
        category::CategoryInput, message::CurrencyFormat, pricing::PricingConfig,
        seating::SeatingSpotInput,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// The whole `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Restaurant identity and messaging destination
    pub restaurant: RestaurantConfig,
    /// Totals formula
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Money rendering
    #[serde(default)]
    pub currency: CurrencyFormat,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Categories created at startup when missing
    #[serde(default)]
    pub categories: Vec<CategoryInput>,
    /// Seating spots created at startup when missing
    #[serde(default)]
    pub seating: Vec<SeatingSpotInput>,
}

/// `[restaurant]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantConfig {
    /// Display name
    pub name: String,
    /// Number booking messages are sent to
    pub whatsapp_number: String,
    /// Deep-link base, e.g. `https://wa.me`
    #[serde(default = "default_messaging_base_url")]
    pub messaging_base_url: String,
    /// Externally reachable origin used to turn `/uploads/...` into full URLs
    #[serde(default)]
    pub public_base_url: String,
}

fn default_messaging_base_url() -> String {
    "https://wa.me".to_string()
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Directory uploads are written to and served from
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Admin token lifetime
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_minutes: i64,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

const fn default_token_lifetime() -> i64 {
    8 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            upload_dir: default_upload_dir(),
            token_lifetime_minutes: default_token_lifetime(),
        }
    }
}

impl AppConfig {
    /// Checks values serde cannot.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.restaurant.name.trim().is_empty() {
            return Err(Error::config("restaurant.name cannot be empty"));
        }
        if !self.restaurant.whatsapp_number.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::config(
                "restaurant.whatsapp_number must contain a phone number",
            ));
        }
        if self.pricing.tax_rate < Decimal::ZERO || self.pricing.tax_rate > Decimal::ONE {
            return Err(Error::config(format!(
                "pricing.tax_rate must be between 0 and 1, got {}",
                self.pricing.tax_rate
            )));
        }
        if self.server.token_lifetime_minutes <= 0 {
            return Err(Error::config("server.token_lifetime_minutes must be positive"));
        }
        Ok(())
    }
}

/// Parses and validates configuration text.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid, a required field is
/// missing, or a value fails validation.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading configuration");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `CONFIG_PATH`, or `./config.toml`.
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?;
    info!(
        path = %path,
        restaurant = %config.restaurant.name,
        tax_enabled = config.pricing.tax_enabled,
        categories = config.categories.len(),
        seating = config.seating.len(),
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const FULL: &str = r#"
        [restaurant]
        name = "Warung Bunda"
        whatsapp_number = "6281234567890"
        public_base_url = "https://bunda.example"

        [pricing]
        tax_enabled = true
        tax_rate = "0.11"

        [currency]
        symbol = "IDR"

        [server]
        bind_address = "127.0.0.1:8080"

        [[categories]]
        name = "Paket Buka Puasa"

        [[categories]]
        name = "Takjil"

        [[seating]]
        name = "Indoor"
        capacity = "2-10 orang"

        [[seating]]
        name = "Rooftop"
        capacity = "4-20 orang"
        is_active = false
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.restaurant.name, "Warung Bunda");
        assert_eq!(config.restaurant.messaging_base_url, "https://wa.me");
        assert_eq!(config.pricing.tax_rate, Decimal::new(11, 2));
        assert_eq!(config.currency.symbol, "IDR");
        assert_eq!(config.currency.group_separator, '.');
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.server.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.categories.len(), 2);
        assert!(config.seating[0].is_active);
        assert!(!config.seating[1].is_active);
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse_config(
            r#"
            [restaurant]
            name = "Warung"
            whatsapp_number = "+62 812"
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.server.token_lifetime_minutes, 480);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(parse_config("[pricing]"), Err(Error::Config { .. })));

        let bad_rate = r#"
            [restaurant]
            name = "Warung"
            whatsapp_number = "0812"
            [pricing]
            tax_rate = "1.5"
        "#;
        assert!(matches!(parse_config(bad_rate), Err(Error::Config { .. })));

        let no_number = r#"
            [restaurant]
            name = "Warung"
            whatsapp_number = "n/a"
        "#;
        assert!(parse_config(no_number).is_err());
    }

    #[test]
    fn test_load_config_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, FULL)?;
        assert_eq!(load_config(&path)?.seating.len(), 2);
        assert!(load_config(dir.path().join("missing.toml")).is_err());
        Ok(())
    }
}
