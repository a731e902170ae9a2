//! # Manager Repository
//!
//! Manager accounts and their role sets.
//!
//! ```text
//! managers (id, name, phone, password_hash, active, created_at)
//!     │ 1
//!     │
//!     │ n
//! manager_roles (manager_id, role)   ← one row per role
//! ```

use std::collections::BTreeSet;

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tally_core::{Manager, Role};
use tracing::debug;

use super::Credentials;
use crate::error::{DbError, DbResult};

const MANAGER_COLUMNS: &str = "id, name, phone, password_hash, active, created_at";

/// Repository for manager database operations.
#[derive(Debug, Clone)]
pub struct ManagerRepository {
    pool: SqlitePool,
}

impl ManagerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ManagerRepository { pool }
    }

    /// Inserts a manager and its roles in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Phone already registered
    pub async fn insert(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
        roles: &BTreeSet<Role>,
    ) -> DbResult<Manager> {
        debug!(phone = %phone, roles = ?roles, "Inserting manager");

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO managers (name, phone, password_hash, active, created_at) \
             VALUES (?1, ?2, ?3, 1, ?4) RETURNING {MANAGER_COLUMNS}"
        );

        let mut manager = sqlx::query_as::<_, Manager>(&sql)
            .bind(name)
            .bind(phone)
            .bind(password_hash)
            .bind(Utc::now().trunc_subsecs(0))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DbError::from(e).with_duplicate("phone", phone))?;

        for role in roles {
            sqlx::query("INSERT INTO manager_roles (manager_id, role) VALUES (?1, ?2)")
                .bind(manager.id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        manager.roles = roles.clone();
        Ok(manager)
    }

    /// Gets a manager by id, roles included.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Manager>> {
        let sql = format!("SELECT {MANAGER_COLUMNS} FROM managers WHERE id = ?1");

        let manager = sqlx::query_as::<_, Manager>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match manager {
            Some(mut manager) => {
                manager.roles = self.roles(id).await?;
                Ok(Some(manager))
            }
            None => Ok(None),
        }
    }

    /// Returns the role set of a manager (empty for unknown ids).
    pub async fn roles(&self, manager_id: i64) -> DbResult<BTreeSet<Role>> {
        let roles: Vec<Role> =
            sqlx::query_scalar("SELECT role FROM manager_roles WHERE manager_id = ?1")
                .bind(manager_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(roles.into_iter().collect())
    }

    /// Set-membership check for a single role.
    pub async fn has_role(&self, manager_id: i64, role: Role) -> DbResult<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM manager_roles WHERE manager_id = ?1 AND role = ?2)",
        )
        .bind(manager_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    /// Looks up the login of a manager by phone.
    pub async fn find_credentials(&self, phone: &str) -> DbResult<Option<Credentials>> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM managers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// Counts all managers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM managers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_database, ADMIN_ID, CASHIER_ID};

    #[tokio::test]
    async fn test_insert_with_roles() {
        let db = fixture_database().await.unwrap();
        let repo = db.managers();
        let roles = BTreeSet::from([Role::Manager, Role::Cashier]);

        let manager = repo
            .insert("Kate", "79994444444", "hash", &roles)
            .await
            .unwrap();
        assert_eq!(manager.roles, roles);

        let loaded = repo.get_by_id(manager.id).await.unwrap().unwrap();
        assert_eq!(loaded.roles, roles);
        assert!(!loaded.is_admin());
    }

    #[tokio::test]
    async fn test_role_membership() {
        let db = fixture_database().await.unwrap();
        let repo = db.managers();

        assert!(repo.has_role(ADMIN_ID, Role::Admin).await.unwrap());
        assert!(!repo.has_role(CASHIER_ID, Role::Admin).await.unwrap());
        assert!(!repo.has_role(999, Role::Admin).await.unwrap());
        assert!(repo.roles(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_phone_rolls_back_roles() {
        let db = fixture_database().await.unwrap();
        let repo = db.managers();
        let before = repo.count().await.unwrap();

        let err = repo
            .insert("Twin", "79990000000", "hash", &BTreeSet::from([Role::Admin]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.count().await.unwrap(), before);
    }
}
