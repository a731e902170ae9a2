//! HTTP routes.
//!
//! ```text
//! GET  /health
//! POST /api/customers                   register
//! POST /api/customers/token             login ─► token
//! POST /api/customers/token/validate    token ─► customerId
//! GET  /api/customers/products          active products
//! POST /api/managers/token              login ─► token
//! POST /api/managers                    (ADMIN) register ─► token
//! POST /api/managers/products           create / update product
//! POST /api/managers/sales              record sale
//! GET  /api/managers/sales              total of own sales
//! GET  /api/managers/sales/{id}         one own sale
//! ```

pub mod customers;
pub mod managers;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::Outcome;
use crate::SharedState;

/// Successful token issuance.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: Outcome,
    pub token: String,
}

impl TokenResponse {
    pub fn ok(token: String) -> Self {
        TokenResponse {
            status: Outcome::Ok,
            token,
        }
    }
}

/// Id of a created or updated entity.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Outcome,
    pub database: bool,
}

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(customers::routes())
        .merge(managers::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: Outcome::Ok,
        database: state.db.health_check().await,
    })
}
