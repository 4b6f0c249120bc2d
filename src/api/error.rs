//! Maps [`Error`] onto HTTP responses with a JSON `{ "error": ... }` body.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::IncompleteSelection { .. }
            | Self::UnknownOption { .. }
            | Self::InvalidIndex { .. }
            | Self::Upload { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            Self::BookingNotFound { .. }
            | Self::MenuItemNotFound { .. }
            | Self::SeatingSpotNotFound { .. }
            | Self::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Database(_)
            | Self::Config { .. }
            | Self::Auth { .. }
            | Self::Io(_)
            | Self::IntConversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            if status == StatusCode::UNAUTHORIZED {
                warn!(error = %self, "Unauthorized request");
            }
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidStatusTransition {
                from: "cancelled".to_string(),
                to: "confirmed".to_string(),
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::BookingNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Unauthorized {
                message: "x".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = Error::Database(sea_orm::DbErr::Custom("secret".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
