//! Service layer.
//!
//! Each service owns a [`Database`](tally_db::Database) handle, validates
//! input with `tally_core::validation`, calls repositories and translates
//! [`DbError`] into [`CoreError`].

pub mod auth_service;
pub mod customer_service;
pub mod manager_service;
pub mod sale_service;

pub use auth_service::AuthService;
pub use customer_service::CustomerService;
pub use manager_service::ManagerService;
pub use sale_service::SaleService;

use tally_core::{CoreError, ValidationError};
use tally_db::DbError;
use tracing::error;

/// Translates storage failures that carry no domain meaning.
///
/// Unique violations become `Validation(Duplicate)`; anything else is logged
/// and folded into `CoreError::Internal`.
pub(crate) fn store_error(context: &'static str, err: DbError) -> CoreError {
    match err {
        DbError::UniqueViolation { field, value } => {
            CoreError::Validation(ValidationError::Duplicate { field, value })
        }
        other => {
            error!(error = %other, context, "Storage failure");
            CoreError::Internal(context.to_string())
        }
    }
}
