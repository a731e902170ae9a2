//! Customer self-service: sign-up and the public product list.

use tally_core::validation::{validate_name, validate_password, validate_phone};
use tally_core::{CoreResult, Customer, NewCustomer, Product};
use tally_db::security::hash_password;
use tally_db::Database;
use tracing::info;

use super::store_error;

/// Maximum number of products returned by [`CustomerService::active_products`].
pub const PRODUCT_LIST_LIMIT: u32 = 500;

#[derive(Debug, Clone)]
pub struct CustomerService {
    db: Database,
}

impl CustomerService {
    pub fn new(db: Database) -> Self {
        CustomerService { db }
    }

    /// Registers a customer. The password is stored as an argon2 hash.
    pub async fn register(&self, input: NewCustomer) -> CoreResult<Customer> {
        validate_name(&input.name)?;
        validate_phone(&input.phone)?;
        validate_password(&input.password)?;

        let password_hash =
            hash_password(&input.password).map_err(|e| store_error("password hash", e))?;

        let customer = self
            .db
            .customers()
            .insert(input.name.trim(), &input.phone, &password_hash)
            .await
            .map_err(|e| store_error("register customer", e))?;

        info!(customer_id = customer.id, "Customer registered");

        Ok(customer)
    }

    /// Active products ordered by id.
    pub async fn active_products(&self) -> CoreResult<Vec<Product>> {
        self.db
            .products()
            .list_active(PRODUCT_LIST_LIMIT)
            .await
            .map_err(|e| store_error("list products", e))
    }
}
