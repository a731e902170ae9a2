//! # Validation Module
//!
//! Input validation rules for Tally.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (Rust)                                               │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (qty >= 0)                                                  │
//! │  ├── UNIQUE (phone)                                                    │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_phone, validate_quantity};
//!
//! validate_phone("79990000000").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::types::{Role, SaleLine};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_POSITIONS, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (customer, manager or product).
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_name;
///
/// assert!(validate_name("Milk 1L").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a phone number used as a login.
///
/// ## Rules
/// - Optional leading `+`
/// - Digits only otherwise, 10 to 15 of them
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if digits.len() < 10 {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: 10,
        });
    }

    if digits.len() > 15 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 15,
        });
    }

    Ok(())
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale: one position                                                     │
/// │                                                                         │
/// │  Manager submits qty: 5                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 9999? → Error: "quantity must be between 1 and 9999"   │
/// │       │                                                                 │
/// │       └── OK → Proceed with the stock decrement                        │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level set through the product upsert.
///
/// Zero is allowed (sold out).
pub fn validate_stock(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price in minor units.
///
/// ## Rules
/// - Between 0 and MAX_UNIT_PRICE (inclusive)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price;
/// use tally_core::MAX_UNIT_PRICE;
///
/// assert!(validate_price(1099).is_ok());
/// assert!(validate_price(0).is_ok());     // Free item
/// assert!(validate_price(-100).is_err());
/// assert!(validate_price(MAX_UNIT_PRICE + 1).is_err());
/// ```
pub fn validate_price(minor: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNIT_PRICE).contains(&minor) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates a database id supplied by a client.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the lines of a sale before any statement is issued.
///
/// ## Rules
/// - At least one line, at most MAX_SALE_POSITIONS
/// - Every product id positive
/// - Every quantity within [`validate_quantity`]
/// - Every unit price within [`validate_price`]
pub fn validate_sale_lines(lines: &[SaleLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "positions".to_string(),
        });
    }

    if lines.len() > MAX_SALE_POSITIONS {
        return Err(ValidationError::OutOfRange {
            field: "positions".to_string(),
            min: 1,
            max: MAX_SALE_POSITIONS as i64,
        });
    }

    for line in lines {
        validate_id("product_id", line.product_id)?;
        validate_quantity(line.quantity)?;
        validate_price(line.unit_price.minor())?;
    }

    Ok(())
}

/// A manager needs at least one role.
pub fn validate_roles(roles: &BTreeSet<Role>) -> ValidationResult<()> {
    if roles.is_empty() {
        return Err(ValidationError::Required {
            field: "roles".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Milk 1L").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("79990000000").is_ok());
        assert!(validate_phone("+79990000000").is_ok());

        assert!(matches!(
            validate_phone(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_phone("7999-000-00"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_phone("12345"),
            Err(ValidationError::TooShort { .. })
        ));
        assert!(validate_phone(&"1".repeat(16)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("rightpass").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_price(MAX_UNIT_PRICE).is_ok());
        assert!(validate_price(MAX_UNIT_PRICE + 1).is_err());
        assert!(validate_price(i64::MAX / 2 + 1).is_err());
    }

    #[test]
    fn test_validate_sale_lines() {
        let line = SaleLine::new(10, 3, Money::from_minor(100));
        assert!(validate_sale_lines(&[line]).is_ok());

        assert!(validate_sale_lines(&[]).is_err());
        assert!(validate_sale_lines(&vec![line; MAX_SALE_POSITIONS + 1]).is_err());
        assert!(validate_sale_lines(&[SaleLine::new(10, 0, Money::from_minor(100))]).is_err());
        assert!(validate_sale_lines(&[SaleLine::new(10, 1, Money::from_minor(-1))]).is_err());
        assert!(validate_sale_lines(&[SaleLine::new(0, 1, Money::from_minor(1))]).is_err());

        // Largest allowed sale still has a representable total
        let biggest = SaleLine::new(10, MAX_ITEM_QUANTITY, Money::from_minor(MAX_UNIT_PRICE));
        assert!(validate_sale_lines(&vec![biggest; MAX_SALE_POSITIONS]).is_ok());
        let huge = SaleLine::new(10, 2, Money::from_minor(i64::MAX / 2 + 1));
        assert!(validate_sale_lines(&[huge]).is_err());
    }

    #[test]
    fn test_validate_roles() {
        assert!(validate_roles(&BTreeSet::new()).is_err());
        assert!(validate_roles(&BTreeSet::from([Role::Cashier])).is_ok());
    }
}
