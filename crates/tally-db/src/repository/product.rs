//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Active catalog listing
//! - Insert / full update (manager upsert)
//! - Stock reads
//!
//! Stock decrements for sales happen inside the sale transaction, see
//! [`SaleRepository::record_sale`](super::sale::SaleRepository::record_sale).

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tally_core::{Product, ProductInput};
use tracing::debug;

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, name, price, qty, active, created_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products ordered by id.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = 1 ORDER BY id LIMIT ?1"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product. The input id is ignored.
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, "Inserting product");

        let sql = format!(
            "INSERT INTO products (name, price, qty, active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.qty)
            .bind(input.active)
            .bind(Utc::now().trunc_subsecs(0))
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Overwrites name, price, stock and active flag of an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        debug!(id = id, "Updating product");

        let sql = format!(
            "UPDATE products SET name = ?1, price = ?2, qty = ?3, active = ?4 \
             WHERE id = ?5 RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.qty)
            .bind(input.active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Current stock of a product, `None` if it doesn't exist.
    pub async fn stock(&self, id: i64) -> DbResult<Option<i64>> {
        let qty: Option<i64> = sqlx::query_scalar("SELECT qty FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(qty)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_database, INACTIVE_PRODUCT_ID, PRODUCT_ID};
    use tally_core::Money;

    fn input(id: Option<i64>, qty: i64) -> ProductInput {
        ProductInput {
            id,
            name: "Kefir".to_string(),
            price: Money::from_minor(120),
            qty,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let db = fixture_database().await.unwrap();

        let products = db.products().list_active(500).await.unwrap();

        assert!(products.iter().all(|p| p.active));
        assert!(products.iter().any(|p| p.id == PRODUCT_ID));
        assert!(!products.iter().any(|p| p.id == INACTIVE_PRODUCT_ID));
        assert!(products.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_insert_then_update() {
        let db = fixture_database().await.unwrap();
        let repo = db.products();

        let created = repo.insert(&input(None, 7)).await.unwrap();
        assert_eq!(created.qty, 7);
        assert_eq!(created.price.minor(), 120);

        let mut change = input(Some(created.id), 9);
        change.active = false;
        let updated = repo.update(created.id, &change).await.unwrap();
        assert_eq!(updated.qty, 9);
        assert!(!updated.active);
        assert_eq!(repo.stock(created.id).await.unwrap(), Some(9));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = fixture_database().await.unwrap();

        let err = db.products().update(999, &input(Some(999), 1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = fixture_database().await.unwrap();

        let result = db.products().update(PRODUCT_ID, &input(Some(PRODUCT_ID), -1)).await;
        assert!(result.is_err());
        assert_eq!(db.products().stock(PRODUCT_ID).await.unwrap(), Some(5));
    }
}
