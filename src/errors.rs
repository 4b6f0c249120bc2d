//! Unified error types for the booking service.
//!
//! Every layer (core logic, configuration, HTTP) returns [`Error`] so that `?`
//! works across module boundaries. The HTTP mapping lives in `api::error`.

use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Any failure reported by the database layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input failed a completeness or consistency check
    #[error("Validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A menu item was ordered without choosing an option for every variant
    #[error("Please choose an option for every variant of '{menu}' (missing: {})", .missing.join(", "))]
    IncompleteSelection {
        /// Menu item name
        menu: String,
        /// Variant names without a selection
        missing: Vec<String>,
    },

    /// The requested variant or option does not exist on the menu item
    #[error("Option '{option}' is not available for variant '{variant}'")]
    UnknownOption {
        /// Variant name as requested
        variant: String,
        /// Option name as requested
        option: String,
    },

    /// A cart line was addressed by an index that does not exist
    #[error("Line item index {index} is out of range (cart has {len} items)")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of line items in the cart
        len: usize,
    },

    /// A booking status change that is not allowed
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Booking with the given id does not exist
    #[error("Booking not found: {id}")]
    BookingNotFound {
        /// Requested id
        id: i64,
    },

    /// Menu item with the given id does not exist
    #[error("Menu item not found: {id}")]
    MenuItemNotFound {
        /// Requested id
        id: i64,
    },

    /// Seating spot with the given id does not exist
    #[error("Seating spot not found: {id}")]
    SeatingSpotNotFound {
        /// Requested id
        id: i64,
    },

    /// Category with the given id does not exist
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Requested id
        id: i64,
    },

    /// Missing or invalid credentials / token
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Reason, safe to show to the client
        message: String,
    },

    /// The upload sink rejected a file
    #[error("Upload failed: {message}")]
    Upload {
        /// Reason for the rejection
        message: String,
    },

    /// Token signing or password hashing failure
    #[error("Authentication backend error: {message}")]
    Auth {
        /// Underlying error description
        message: String,
    },

    /// I/O error (uploads, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Integer did not fit the target type (e.g. quantity into a database column)
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
