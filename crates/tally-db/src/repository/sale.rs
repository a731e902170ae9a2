//! # Sale Repository
//!
//! Database operations for sales and their positions.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale (ONE transaction)                        │
//! │                                                                         │
//! │  BEGIN IMMEDIATE (write lock up front, waits on busy_timeout)          │
//! │    customer exists?                 no ─► CustomerNotFound, ROLLBACK    │
//! │    INSERT sales ... RETURNING id                                        │
//! │    for each line, in order:                                             │
//! │      UPDATE products SET qty = qty - n                                  │
//! │        WHERE id = :id AND qty >= n                                      │
//! │      0 rows? ─► product missing  ─► NotFound,       ROLLBACK            │
//! │              └► product present  ─► StockExhausted, ROLLBACK            │
//! │      INSERT sale_positions (price, qty as supplied)                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Early return drops the transaction, which rolls it back: no header,   │
//! │  no partial decrement survives a failure or a cancelled request.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tally_core::{Money, Sale, SaleLine, SalePosition};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale header, decrements stock and inserts one position per
    /// line, atomically.
    ///
    /// ## Returns
    /// * `Ok(sale_id)`
    /// * `Err(DbError::NotFound)` - customer or product missing
    /// * `Err(DbError::StockExhausted)` - a line asks for more than is on hand
    pub async fn record_sale(
        &self,
        manager_id: i64,
        customer_id: i64,
        lines: &[SaleLine],
    ) -> DbResult<i64> {
        debug!(
            manager_id = manager_id,
            customer_id = customer_id,
            lines = lines.len(),
            "Recording sale"
        );

        let now = Utc::now().trunc_subsecs(0);
        // Write lock up front: a deferred read cannot upgrade under a
        // concurrent writer and fails with SQLITE_BUSY without waiting.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let customer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)")
                .bind(customer_id)
                .fetch_one(&mut *tx)
                .await?;
        if !customer_exists {
            return Err(DbError::not_found("Customer", customer_id));
        }

        let sale_id: i64 = sqlx::query_scalar(
            "INSERT INTO sales (manager_id, customer_id, created_at) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(manager_id)
        .bind(customer_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            let updated = sqlx::query(
                "UPDATE products SET qty = qty - ?1 WHERE id = ?2 AND qty >= ?1",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT qty FROM products WHERE id = ?1")
                        .bind(line.product_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match available {
                    None => DbError::not_found("Product", line.product_id),
                    Some(available) => DbError::StockExhausted {
                        product_id: line.product_id,
                        available,
                        requested: line.quantity,
                    },
                });
            }

            sqlx::query(
                "INSERT INTO sale_positions (sale_id, product_id, price, qty, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(sale_id = sale_id, "Sale recorded");
        Ok(sale_id)
    }

    /// Gets a sale header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, manager_id, customer_id, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the positions of a sale in insertion order.
    pub async fn get_positions(&self, sale_id: i64) -> DbResult<Vec<SalePosition>> {
        let positions = sqlx::query_as::<_, SalePosition>(
            "SELECT id, sale_id, product_id, price, qty, created_at \
             FROM sale_positions WHERE sale_id = ?1 ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }

    /// Sum of `qty * price` over every position of every sale owned by the
    /// manager.
    ///
    /// ## Returns
    /// * `Ok(None)` - the manager has no sales
    pub async fn manager_total(&self, manager_id: i64) -> DbResult<Option<Money>> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(sp.qty * sp.price) \
             FROM sales s \
             JOIN sale_positions sp ON sp.sale_id = s.id \
             WHERE s.manager_id = ?1 \
             GROUP BY s.manager_id",
        )
        .bind(manager_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(total.map(Money::from_minor))
    }

    /// Counts all sale headers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
