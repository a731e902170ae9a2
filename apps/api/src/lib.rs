//! # Tally API
//!
//! REST server for the Tally retail-sales backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Tally API                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │ routes (axum)                                                     │  │
//! │  │   /health                                                         │  │
//! │  │   /api/customers/*    sign-up, token, validate, product list     │  │
//! │  │   /api/managers/*     token, register, products, sales           │  │
//! │  └──────────────┬─────────────────────────────┬─────────────────────┘  │
//! │                 │ ManagerSession extractor    │                         │
//! │  ┌──────────────▼─────────────────────────────▼─────────────────────┐  │
//! │  │ services                                                          │  │
//! │  │   AuthService   SaleService   ManagerService   CustomerService   │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │ tally-db (SQLite via sqlx)                                        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use tally_db::Database;

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::router;

use crate::services::{AuthService, CustomerService, ManagerService, SaleService};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    auth: AuthService,
    sales: SaleService,
    managers: ManagerService,
    customers: CustomerService,
}

/// State handed to every handler.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            auth: AuthService::new(db.clone(), config.token_ttl()),
            sales: SaleService::new(db.clone()),
            managers: ManagerService::new(db.clone()),
            customers: CustomerService::new(db.clone()),
            db,
            config,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn sales(&self) -> &SaleService {
        &self.sales
    }

    pub fn managers(&self) -> &ManagerService {
        &self.managers
    }

    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }
}
