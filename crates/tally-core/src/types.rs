//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │    Manager      │   │  TokenRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  token (hex)    │       │
//! │  │  phone (login)  │   │  phone (login)  │   │  principal_id   │       │
//! │  │  password_hash  │   │  roles {Role}   │   │  expires_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  SalePosition   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price (Money)  │◄──│  manager_id     │──►│  product_id     │       │
//! │  │  qty (>= 0)     │   │  customer_id    │   │  price, qty     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity uses an integer id assigned by the database. Customers and
//! managers log in with their phone number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::money::Money;

// =============================================================================
// Principal Kind
// =============================================================================

/// The two kinds of principal that can hold a bearer token.
///
/// Each kind has its own credential table and its own token table, so a
/// customer token never authenticates a manager and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Customer,
    Manager,
}

impl PrincipalKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Customer => "customer",
            PrincipalKind::Manager => "manager",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Role
// =============================================================================

/// A manager role.
///
/// Stored one row per role in `manager_roles`; the text form is the
/// uppercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// May register new managers.
    Admin,
    Manager,
    Cashier,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Cashier => "CASHIER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Principals
// =============================================================================

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Login.
    pub phone: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A manager account with its role set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Manager {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Loaded separately from `manager_roles`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl Manager {
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Input for registering a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub password: String,
}

/// Input for registering a manager.
#[derive(Debug, Clone, Deserialize)]
pub struct NewManager {
    pub name: String,
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

// =============================================================================
// Tokens
// =============================================================================

/// A persisted bearer token.
///
/// Tokens are immutable once written. Expiry is checked lazily on lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TokenRecord {
    pub token: String,
    pub principal_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    /// A token is still valid at its expiry instant and expired strictly after.
    ///
    /// ```rust
    /// use chrono::{Duration, Utc};
    /// use tally_core::TokenRecord;
    ///
    /// let now = Utc::now();
    /// let record = TokenRecord {
    ///     token: "ab".into(),
    ///     principal_id: 1,
    ///     expires_at: now,
    ///     created_at: now,
    /// };
    /// assert!(!record.is_expired_at(now));
    /// assert!(record.is_expired_at(now + Duration::seconds(1)));
    /// ```
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Result of a successful token issuance.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub principal_id: i64,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Quantity on hand. Never negative.
    pub qty: i64,
    /// Inactive products are hidden from the customer catalog.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert-or-update payload for a product.
///
/// `id` of `None` (or 0) creates a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub price: Money,
    pub qty: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductInput {
    /// Returns the id to update, if this input targets an existing product.
    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub manager_id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One product line inside a recorded sale.
///
/// `price` is the unit price supplied with the sale, frozen at that time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalePosition {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub price: Money,
    pub qty: i64,
    pub created_at: DateTime<Utc>,
}

impl SalePosition {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

/// A requested sale line before it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    pub const fn new(product_id: i64, quantity: i64, unit_price: Money) -> Self {
        SaleLine {
            product_id,
            quantity,
            unit_price,
        }
    }
}

/// A sale together with its positions.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: Sale,
    pub positions: Vec<SalePosition>,
    pub total: Money,
}

impl SaleDetails {
    pub fn new(sale: Sale, positions: Vec<SalePosition>) -> Self {
        let total = positions.iter().map(SalePosition::line_total).sum();
        SaleDetails {
            sale,
            positions,
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Manager.to_string(), "MANAGER");
        assert_eq!(Role::Cashier.as_str(), "CASHIER");
    }

    #[test]
    fn test_role_serde_uppercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"CASHIER\"").unwrap();
        assert_eq!(role, Role::Cashier);
    }

    #[test]
    fn test_manager_role_membership() {
        let mut manager = Manager {
            id: 1,
            name: "Boss".to_string(),
            phone: "79990000000".to_string(),
            password_hash: String::new(),
            active: true,
            created_at: Utc::now(),
            roles: BTreeSet::from([Role::Manager]),
        };
        assert!(!manager.is_admin());

        manager.roles.insert(Role::Admin);
        assert!(manager.is_admin());
    }

    #[test]
    fn test_customer_hides_password_hash() {
        let customer = Customer {
            id: 2,
            name: "Ann".to_string(),
            phone: "79991111111".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_token_expiry_boundary() {
        let expires_at = Utc::now();
        let record = TokenRecord {
            token: "00ff".to_string(),
            principal_id: 1,
            expires_at,
            created_at: expires_at - Duration::hours(1),
        };

        assert!(!record.is_expired_at(expires_at - Duration::seconds(1)));
        assert!(!record.is_expired_at(expires_at));
        assert!(record.is_expired_at(expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_product_input_existing_id() {
        let mut input = ProductInput {
            id: None,
            name: "Milk".to_string(),
            price: Money::from_minor(100),
            qty: 5,
            active: true,
        };
        assert_eq!(input.existing_id(), None);

        input.id = Some(0);
        assert_eq!(input.existing_id(), None);

        input.id = Some(10);
        assert_eq!(input.existing_id(), Some(10));
    }

    #[test]
    fn test_sale_details_total() {
        let now = Utc::now();
        let position = |id, price, qty| SalePosition {
            id,
            sale_id: 1,
            product_id: 10,
            price: Money::from_minor(price),
            qty,
            created_at: now,
        };
        let sale = Sale {
            id: 1,
            manager_id: 1,
            customer_id: 2,
            created_at: now,
        };

        let details = SaleDetails::new(sale, vec![position(1, 100, 3), position(2, 350, 2)]);
        assert_eq!(details.total.minor(), 1000);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["manager_id"], 1);
        assert_eq!(json["total"], 1000);
    }
}
