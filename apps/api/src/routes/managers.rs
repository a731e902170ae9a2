//! Manager endpoints. Everything except the token endpoint needs a
//! [`ManagerSession`].

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tally_core::{Money, NewManager, PrincipalKind, ProductInput, SaleDetails, SaleLine};
use tracing::info;

use super::{IdResponse, TokenResponse};
use crate::auth::ManagerSession;
use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct ManagerTokenRequest {
    pub phone: String,
    pub password: String,
}

/// One position of a sale as sent by the client.
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub product_id: i64,
    pub qty: i64,
    pub price: Money,
}

#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub customer_id: i64,
    pub positions: Vec<PositionRequest>,
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub manager_id: i64,
    pub total: Money,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/managers", post(register))
        .route("/api/managers/token", post(issue_token))
        .route("/api/managers/products", post(save_product))
        .route("/api/managers/sales", post(record_sale).get(sales_total))
        .route("/api/managers/sales/{id}", get(get_sale))
}

async fn issue_token(
    State(state): State<SharedState>,
    Json(request): Json<ManagerTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .auth()
        .issue_token(PrincipalKind::Manager, &request.phone, &request.password)
        .await
        .map_err(ApiError::auth)?;

    Ok(Json(TokenResponse::ok(issued.token)))
}

/// Registers a manager and answers with a token for the new account.
async fn register(
    State(state): State<SharedState>,
    ManagerSession(caller_id): ManagerSession,
    Json(input): Json<NewManager>,
) -> Result<Json<TokenResponse>, ApiError> {
    let manager = state.managers().register_manager(caller_id, input).await?;

    let issued = state
        .auth()
        .issue_token_for_principal(PrincipalKind::Manager, manager.id)
        .await?;

    Ok(Json(TokenResponse::ok(issued.token)))
}

async fn save_product(
    State(state): State<SharedState>,
    ManagerSession(manager_id): ManagerSession,
    Json(input): Json<ProductInput>,
) -> Result<Json<IdResponse>, ApiError> {
    let product = state.managers().upsert_product(input).await?;

    info!(manager_id, product_id = product.id, "Product changed");

    Ok(Json(IdResponse { id: product.id }))
}

async fn record_sale(
    State(state): State<SharedState>,
    ManagerSession(manager_id): ManagerSession,
    Json(request): Json<SaleRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let lines: Vec<SaleLine> = request
        .positions
        .iter()
        .map(|p| SaleLine::new(p.product_id, p.qty, p.price))
        .collect();

    let id = state
        .sales()
        .record_sale(manager_id, request.customer_id, &lines)
        .await?;

    Ok(Json(IdResponse { id }))
}

async fn sales_total(
    State(state): State<SharedState>,
    ManagerSession(manager_id): ManagerSession,
) -> Result<Json<TotalResponse>, ApiError> {
    let total = state.sales().manager_sales_total(manager_id).await?;

    Ok(Json(TotalResponse { manager_id, total }))
}

async fn get_sale(
    State(state): State<SharedState>,
    ManagerSession(manager_id): ManagerSession,
    Path(sale_id): Path<i64>,
) -> Result<Json<SaleDetails>, ApiError> {
    Ok(Json(state.sales().get_sale(manager_id, sale_id).await?))
}
