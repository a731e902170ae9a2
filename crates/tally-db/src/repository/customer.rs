//! # Customer Repository
//!
//! Customer accounts. Phone numbers are unique logins.

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tally_core::Customer;
use tracing::debug;

use super::Credentials;
use crate::error::{DbError, DbResult};

const CUSTOMER_COLUMNS: &str = "id, name, phone, password_hash, active, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new active customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Phone already registered
    pub async fn insert(&self, name: &str, phone: &str, password_hash: &str) -> DbResult<Customer> {
        debug!(phone = %phone, "Inserting customer");

        let sql = format!(
            "INSERT INTO customers (name, phone, password_hash, active, created_at) \
             VALUES (?1, ?2, ?3, 1, ?4) RETURNING {CUSTOMER_COLUMNS}"
        );

        sqlx::query_as::<_, Customer>(&sql)
            .bind(name)
            .bind(phone)
            .bind(password_hash)
            .bind(Utc::now().trunc_subsecs(0))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate("phone", phone))
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Looks up the login of a customer by phone.
    pub async fn find_credentials(&self, phone: &str) -> DbResult<Option<Credentials>> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM customers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// Counts all customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
