//! # tally-core: Pure Domain Logic for Tally
//!
//! This crate holds the domain model of the Tally retail-sales backend as
//! plain types and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP clients (JSON)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            apps/api (axum routes + services)                    │   │
//! │  │    AuthService, SaleService, ManagerService, CustomerService    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │ Principal │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │ Sale/Role │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Manager, Product, Sale, Token, Role)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//!
//! let unit_price = Money::from_minor(100);
//! let line_total = unit_price.multiply_quantity(3);
//!
//! assert_eq!(line_total.minor(), 300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of positions in a single sale.
pub const MAX_SALE_POSITIONS: usize = 100;

/// Maximum quantity of a single product in one sale position.
///
/// ## Business Reason
/// Catches typos (1000 instead of 10) before they drain the stock.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Maximum unit price in minor units (10 million major units).
///
/// Keeps `MAX_UNIT_PRICE * MAX_ITEM_QUANTITY * MAX_SALE_POSITIONS` well inside
/// i64, so a line total or a sale total can never overflow.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// Default bearer token lifetime in seconds (one hour).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3_600;

/// Number of random bytes behind every bearer token.
///
/// Hex encoding doubles this, so tokens are 512 characters long.
pub const TOKEN_BYTES: usize = 256;

const _: () = assert!(
    MAX_UNIT_PRICE as i128 * MAX_ITEM_QUANTITY as i128 * MAX_SALE_POSITIONS as i128
        <= i64::MAX as i128
);
