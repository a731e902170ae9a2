//! Error types for the API.
//!
//! ```text
//! CoreError ──► ApiError ──► HTTP response
//!
//! authentication failures       {"status":"fail","reason":"..."}
//!   PrincipalNotFound/TokenNotFound   404 "not found"
//!   TokenExpired                      400 "expired"
//!   InvalidCredentials                401 "invalid credentials"
//!   Internal                          500 "internal error"
//!
//! everything else               text/plain
//!   Validation 400 · Unauthorized 403 · *NotFound/NoSales 404
//!   InsufficientStock 409 · Internal 500
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tally_core::CoreError;

/// Outcome marker of the JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok,
    Fail,
}

/// Body of an authentication failure.
#[derive(Debug, Serialize)]
pub struct FailResponse {
    pub status: Outcome,
    pub reason: &'static str,
}

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication failure answered with the fail envelope.
    #[error("{reason}")]
    Auth {
        status: StatusCode,
        reason: &'static str,
    },

    /// Any other failure, answered with a bare text body.
    #[error("{message}")]
    Plain { status: StatusCode, message: String },
}

impl ApiError {
    /// Maps an error raised while issuing or validating a token.
    pub fn auth(err: CoreError) -> Self {
        let (status, reason) = match err {
            CoreError::PrincipalNotFound { .. } | CoreError::TokenNotFound => {
                (StatusCode::NOT_FOUND, "not found")
            }
            CoreError::TokenExpired { .. } => (StatusCode::BAD_REQUEST, "expired"),
            CoreError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };
        ApiError::Auth { status, reason }
    }

    /// Maps an error raised while resolving the bearer token of a protected
    /// route. Unknown and expired tokens both answer 401.
    pub fn unauthenticated(err: CoreError) -> Self {
        match err {
            CoreError::TokenNotFound => ApiError::Auth {
                status: StatusCode::UNAUTHORIZED,
                reason: "not found",
            },
            CoreError::TokenExpired { .. } => ApiError::Auth {
                status: StatusCode::UNAUTHORIZED,
                reason: "expired",
            },
            other => ApiError::auth(other),
        }
    }

    /// No usable `Authorization` header.
    pub fn missing_token() -> Self {
        ApiError::Auth {
            status: StatusCode::UNAUTHORIZED,
            reason: "missing token",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth { status, .. } | ApiError::Plain { status, .. } => *status,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_authentication() {
            return ApiError::auth(err);
        }

        let status = match &err {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized(_) => StatusCode::FORBIDDEN,
            CoreError::ProductNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::SaleNotFound(_)
            | CoreError::NoSales(_) => StatusCode::NOT_FOUND,
            CoreError::InsufficientStock { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &err {
            CoreError::Internal(_) => "internal error".to_string(),
            _ => err.to_string(),
        };

        ApiError::Plain { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth { status, reason } => (
                status,
                Json(FailResponse {
                    status: Outcome::Fail,
                    reason,
                }),
            )
                .into_response(),
            ApiError::Plain { status, message } => (status, message).into_response(),
        }
    }
}
