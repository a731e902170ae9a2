//! Manager-only operations: registering further managers and maintaining
//! the product catalog.

use tally_core::validation::{
    validate_name, validate_password, validate_phone, validate_price, validate_roles,
    validate_stock,
};
use tally_core::{CoreError, CoreResult, Manager, NewManager, Product, ProductInput, Role};
use tally_db::security::hash_password;
use tally_db::{Database, DbError};
use tracing::{info, warn};

use super::store_error;

/// Manager administration service.
#[derive(Debug, Clone)]
pub struct ManagerService {
    db: Database,
}

impl ManagerService {
    pub fn new(db: Database) -> Self {
        ManagerService { db }
    }

    /// Registers a manager on behalf of `caller_id`.
    ///
    /// The caller must hold the `ADMIN` role. Nothing is written otherwise.
    pub async fn register_manager(&self, caller_id: i64, input: NewManager) -> CoreResult<Manager> {
        let is_admin = self
            .db
            .managers()
            .has_role(caller_id, Role::Admin)
            .await
            .map_err(|e| store_error("role check", e))?;

        if !is_admin {
            warn!(caller_id, "Manager registration refused: caller is not ADMIN");
            return Err(CoreError::Unauthorized("ADMIN role required".to_string()));
        }

        validate_name(&input.name)?;
        validate_phone(&input.phone)?;
        validate_password(&input.password)?;
        validate_roles(&input.roles)?;

        let password_hash =
            hash_password(&input.password).map_err(|e| store_error("password hash", e))?;

        let manager = self
            .db
            .managers()
            .insert(input.name.trim(), &input.phone, &password_hash, &input.roles)
            .await
            .map_err(|e| store_error("register manager", e))?;

        info!(
            manager_id = manager.id,
            caller_id,
            roles = ?manager.roles,
            "Manager registered"
        );

        Ok(manager)
    }

    /// Creates a product when `input.id` is absent or 0, otherwise overwrites
    /// the existing one.
    pub async fn upsert_product(&self, mut input: ProductInput) -> CoreResult<Product> {
        input.name = input.name.trim().to_string();

        validate_name(&input.name)?;
        validate_price(input.price.minor())?;
        validate_stock(input.qty)?;

        let products = self.db.products();

        let product = match input.existing_id() {
            Some(id) => products.update(id, &input).await.map_err(|e| match e {
                DbError::NotFound { id, .. } => CoreError::ProductNotFound(id),
                other => store_error("update product", other),
            })?,
            None => products
                .insert(&input)
                .await
                .map_err(|e| store_error("insert product", e))?,
        };

        info!(product_id = product.id, qty = product.qty, "Product saved");

        Ok(product)
    }
}
