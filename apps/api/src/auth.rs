//! Bearer token authentication for protected routes.
//!
//! Handlers that need a signed-in manager take a [`ManagerSession`]
//! argument; the extractor resolves the `Authorization` header before the
//! handler body runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tally_core::PrincipalKind;
use tracing::debug;

use crate::error::ApiError;
use crate::SharedState;

/// Extract the token from an authorization header value.
///
/// Both `Bearer <token>` and a bare `<token>` are accepted.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .unwrap_or(auth_header)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Id of the manager who presented a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSession(pub i64);

impl FromRequestParts<SharedState> for ManagerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(ApiError::missing_token)?;

        let manager_id = state
            .auth()
            .resolve_principal(PrincipalKind::Manager, token)
            .await
            .map_err(ApiError::unauthenticated)?;

        debug!(manager_id, "Manager authenticated");

        Ok(ManagerSession(manager_id))
    }
}
