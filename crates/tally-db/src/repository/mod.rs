//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (apps/api)                                                    │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(manager_id, customer_id, &lines)       │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(..)        one transaction                            │
//! │  ├── get_by_id(id)                                                     │
//! │  ├── get_positions(sale_id)                                            │
//! │  └── manager_total(manager_id)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives here and nowhere else.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer accounts
//! - [`ManagerRepository`](manager::ManagerRepository) - Manager accounts and roles
//! - [`ProductRepository`](product::ProductRepository) - Catalog and stock
//! - [`SaleRepository`](sale::SaleRepository) - Sales, positions, totals
//! - [`TokenRepository`](token::TokenRepository) - Bearer tokens per principal kind

pub mod customer;
pub mod manager;
pub mod product;
pub mod sale;
pub mod token;

/// Login lookup result: the principal id and its stored password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
}
