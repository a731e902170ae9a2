//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Domain errors returned by services             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - Status code + body the client sees             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError                           │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                           ApiError → HTTP response                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures that carry no domain meaning are folded into
//! [`CoreError::Internal`] by the service layer after being logged, so that
//! storage details never reach the client.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::PrincipalKind;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors produced by the authentication and sale operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No principal of the given kind has the presented login.
    #[error("{kind} not found")]
    PrincipalNotFound { kind: PrincipalKind },

    /// The login exists but the password does not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The presented bearer token is unknown.
    #[error("Token not found")]
    TokenNotFound,

    /// The bearer token exists but its expiry instant has passed.
    #[error("Token expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },

    /// The caller is authenticated but lacks the required role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer referenced by a sale cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sale cannot be found (or belongs to another manager).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Insufficient stock to complete a sale position.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale position (product 10, qty: 5)
    ///      │
    ///      ▼
    /// Conditional decrement: qty >= 5? available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 10, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole sale rolled back, client gets 409
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// The manager has not recorded any sale yet.
    #[error("No sales recorded for manager {0}")]
    NoSales(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unexpected storage failure. The detail is logged, never shown.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns true for the errors produced while authenticating a principal.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            CoreError::PrincipalNotFound { .. }
                | CoreError::InvalidCredentials
                | CoreError::TokenNotFound
                | CoreError::TokenExpired { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any statement is issued.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., letters in a phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., phone already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
