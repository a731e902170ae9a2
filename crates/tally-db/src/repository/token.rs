//! # Token Repository
//!
//! Bearer tokens, one table per principal kind:
//!
//! ```text
//! customer_tokens (token, customer_id, expires_at, created_at)
//! manager_tokens  (token, manager_id,  expires_at, created_at)
//! ```
//!
//! Rows are only ever inserted. Expiry is evaluated by the caller.

use sqlx::SqlitePool;
use tally_core::{PrincipalKind, TokenRecord};
use tracing::debug;

use crate::error::DbResult;

fn insert_sql(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => {
            "INSERT INTO customer_tokens (token, customer_id, expires_at, created_at) \
             VALUES (?1, ?2, ?3, ?4)"
        }
        PrincipalKind::Manager => {
            "INSERT INTO manager_tokens (token, manager_id, expires_at, created_at) \
             VALUES (?1, ?2, ?3, ?4)"
        }
    }
}

fn select_sql(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => {
            "SELECT token, customer_id AS principal_id, expires_at, created_at \
             FROM customer_tokens WHERE token = ?1"
        }
        PrincipalKind::Manager => {
            "SELECT token, manager_id AS principal_id, expires_at, created_at \
             FROM manager_tokens WHERE token = ?1"
        }
    }
}

fn count_sql(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => "SELECT COUNT(*) FROM customer_tokens WHERE customer_id = ?1",
        PrincipalKind::Manager => "SELECT COUNT(*) FROM manager_tokens WHERE manager_id = ?1",
    }
}

/// Repository for bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TokenRepository { pool }
    }

    /// Persists a freshly issued token.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - the principal doesn't exist
    pub async fn insert(&self, kind: PrincipalKind, record: &TokenRecord) -> DbResult<()> {
        debug!(kind = %kind, principal_id = record.principal_id, "Storing token");

        sqlx::query(insert_sql(kind))
            .bind(&record.token)
            .bind(record.principal_id)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Looks a token up by its exact string.
    pub async fn find(&self, kind: PrincipalKind, token: &str) -> DbResult<Option<TokenRecord>> {
        let record = sqlx::query_as::<_, TokenRecord>(select_sql(kind))
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Number of tokens ever issued to a principal.
    pub async fn count_for(&self, kind: PrincipalKind, principal_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(count_sql(kind))
            .bind(principal_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
