//! In-memory database fixture shared by the unit tests of this crate and of
//! the API server (enable the `testing` feature).
//!
//! ```text
//! managers   1  "79990000000" / "rightpass"     ADMIN, MANAGER
//!            3  "79993333333" / "cashierpass"   CASHIER
//! customers  2  "79992222222" / "customerpass"
//! products  10  Milk        price 100  qty 5
//!           11  Bread       price 350  qty 20
//!           12  Old stock   price 50   qty 1   inactive
//! ```

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SubsecRound, Utc};

use crate::error::DbResult;
use crate::security::hash_password;
use crate::{Database, DbConfig};

pub const ADMIN_ID: i64 = 1;
pub const ADMIN_PHONE: &str = "79990000000";
pub const ADMIN_PASSWORD: &str = "rightpass";

pub const CASHIER_ID: i64 = 3;
pub const CASHIER_PHONE: &str = "79993333333";
pub const CASHIER_PASSWORD: &str = "cashierpass";

pub const CUSTOMER_ID: i64 = 2;
pub const CUSTOMER_PHONE: &str = "79992222222";
pub const CUSTOMER_PASSWORD: &str = "customerpass";

pub const PRODUCT_ID: i64 = 10;
pub const SECOND_PRODUCT_ID: i64 = 11;
pub const INACTIVE_PRODUCT_ID: i64 = 12;

/// Opens a fresh in-memory database and loads the fixture rows.
pub async fn fixture_database() -> DbResult<Database> {
    fixture_database_with(DbConfig::in_memory()).await
}

/// Opens a database with the given configuration and loads the fixture rows.
///
/// The database must be empty.
pub async fn fixture_database_with(config: DbConfig) -> DbResult<Database> {
    let db = Database::new(config).await?;
    load_fixture(&db).await?;
    Ok(db)
}

/// A unique database file under the system temp directory.
///
/// The file and its WAL companions are removed on drop.
#[derive(Debug)]
pub struct TempDbFile {
    path: PathBuf,
}

impl TempDbFile {
    pub fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let file = format!("tally-{name}-{}-{nanos}.db", std::process::id());

        TempDbFile {
            path: std::env::temp_dir().join(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

async fn load_fixture(db: &Database) -> DbResult<()> {
    let now = Utc::now().trunc_subsecs(0);
    let pool = db.pool();

    for (id, name, phone, password) in [
        (ADMIN_ID, "Admin", ADMIN_PHONE, ADMIN_PASSWORD),
        (CASHIER_ID, "Cashier", CASHIER_PHONE, CASHIER_PASSWORD),
    ] {
        sqlx::query(
            "INSERT INTO managers (id, name, phone, password_hash, active, created_at) \
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(hash_password(password)?)
        .bind(now)
        .execute(pool)
        .await?;
    }

    for (manager_id, role) in [(ADMIN_ID, "ADMIN"), (ADMIN_ID, "MANAGER"), (CASHIER_ID, "CASHIER")] {
        sqlx::query("INSERT INTO manager_roles (manager_id, role) VALUES (?1, ?2)")
            .bind(manager_id)
            .bind(role)
            .execute(pool)
            .await?;
    }

    sqlx::query(
        "INSERT INTO customers (id, name, phone, password_hash, active, created_at) \
         VALUES (?1, 'Ann', ?2, ?3, 1, ?4)",
    )
    .bind(CUSTOMER_ID)
    .bind(CUSTOMER_PHONE)
    .bind(hash_password(CUSTOMER_PASSWORD)?)
    .bind(now)
    .execute(pool)
    .await?;

    for (id, name, price, qty, active) in [
        (PRODUCT_ID, "Milk", 100_i64, 5_i64, true),
        (SECOND_PRODUCT_ID, "Bread", 350, 20, true),
        (INACTIVE_PRODUCT_ID, "Old stock", 50, 1, false),
    ] {
        sqlx::query(
            "INSERT INTO products (id, name, price, qty, active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(qty)
        .bind(active)
        .bind(now)
        .execute(pool)
        .await?;
    }

    Ok(())
}
