//! Customer endpoints. None of them require a token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tally_core::{Customer, NewCustomer, PrincipalKind, Product};

use super::TokenResponse;
use crate::error::{ApiError, Outcome};
use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct CustomerTokenRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub status: Outcome,
    #[serde(rename = "customerId")]
    pub customer_id: i64,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/customers", post(register))
        .route("/api/customers/token", post(issue_token))
        .route("/api/customers/token/validate", post(validate_token))
        .route("/api/customers/products", get(products))
}

async fn register(
    State(state): State<SharedState>,
    Json(input): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.customers().register(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn issue_token(
    State(state): State<SharedState>,
    Json(request): Json<CustomerTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .auth()
        .issue_token(PrincipalKind::Customer, &request.login, &request.password)
        .await
        .map_err(ApiError::auth)?;

    Ok(Json(TokenResponse::ok(issued.token)))
}

async fn validate_token(
    State(state): State<SharedState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let customer_id = state
        .auth()
        .resolve_principal(PrincipalKind::Customer, &request.token)
        .await
        .map_err(ApiError::auth)?;

    Ok(Json(ValidateResponse {
        status: Outcome::Ok,
        customer_id,
    }))
}

async fn products(State(state): State<SharedState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.customers().active_products().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tally_db::testing::{CUSTOMER_ID, CUSTOMER_PASSWORD, CUSTOMER_PHONE, PRODUCT_ID};

    use crate::routes::test_support::{app, json, send};

    #[tokio::test]
    async fn test_token_then_validate() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers/token",
            None,
            Some(json!({ "login": CUSTOMER_PHONE, "password": CUSTOMER_PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "ok");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers/token/validate",
            None,
            Some(json!({ "token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["customerId"], CUSTOMER_ID);
    }

    #[tokio::test]
    async fn test_token_failures() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers/token",
            None,
            Some(json!({ "login": CUSTOMER_PHONE, "password": "wrongpass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body), json!({ "status": "fail", "reason": "invalid credentials" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers/token",
            None,
            Some(json!({ "login": "00000000000", "password": "whatever" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["reason"], "not found");
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers/token/validate",
            None,
            Some(json!({ "token": "deadbeef" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body), json!({ "status": "fail", "reason": "not found" }));
    }

    #[tokio::test]
    async fn test_register_hides_password() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/customers",
            None,
            Some(json!({ "name": "Vera", "phone": "79996666666", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let body = json(&body);
        assert_eq!(body["phone"], "79996666666");
        assert!(body.get("password_hash").is_none());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/customers",
            None,
            Some(json!({ "name": "Vera", "phone": "79996666666", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_products() {
        let (app, _) = app().await;

        let (status, body) = send(&app, Method::GET, "/api/customers/products", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        let products = body.as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["id"], PRODUCT_ID);
        assert_eq!(products[0]["price"], 100);
    }
}
