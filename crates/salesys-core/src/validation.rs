//! # Validation Module
//!
//! Input validation for the maintenance screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Desktop command (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rules, before any backend call              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Uniqueness, foreign keys, password hashing                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salesys_core::validation::{validate_product_code, validate_stock};
//!
//! assert!(validate_product_code("CAF-01").is_ok());
//! assert!(validate_stock(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewCustomer, NewProduct, NewUser};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use salesys_core::validation::validate_product_code;
///
/// assert!(validate_product_code("7501055300075").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    required("code", code)?;
    max_len("code", code, 50)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_len("name", name, 200)
}

/// Prices may be zero (free items) but never negative.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_product_code(&product.code)?;
    validate_price(product.price)?;
    validate_stock(product.stock)
}

// =============================================================================
// Customers
// =============================================================================

pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_len("name", name, 200)
}

/// Validates an e-mail address: one `@`, a non-empty local part and a dotted
/// domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;
    max_len("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || !domain.contains('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a Mexican tax id (RFC).
///
/// ## Rules
/// - 12 characters (companies) or 13 (individuals)
/// - Letters (including `Ñ` and `&`) and digits only
///
/// ## Example
/// ```rust
/// use salesys_core::validation::validate_rfc;
///
/// assert!(validate_rfc("XAXX010101000").is_ok());
/// assert!(validate_rfc("ABC").is_err());
/// ```
pub fn validate_rfc(rfc: &str) -> ValidationResult<()> {
    let rfc = rfc.trim();
    required("rfc", rfc)?;

    let len = rfc.chars().count();
    if !(12..=13).contains(&len) {
        return Err(ValidationError::InvalidFormat {
            field: "rfc".to_string(),
            reason: "must be 12 or 13 characters".to_string(),
        });
    }

    if !rfc.chars().all(|c| c.is_ascii_alphanumeric() || c == '&' || c == 'Ñ' || c == 'ñ') {
        return Err(ValidationError::InvalidFormat {
            field: "rfc".to_string(),
            reason: "must contain only letters and numbers".to_string(),
        });
    }

    Ok(())
}

/// Only the name is mandatory; optional fields are checked when present.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_customer_name(&customer.name)?;

    if let Some(email) = non_blank(&customer.email) {
        validate_email(email)?;
    }
    if let Some(phone) = non_blank(&customer.phone) {
        max_len("phone", phone, 20)?;
    }
    if let Some(address) = non_blank(&customer.address) {
        max_len("address", address, 300)?;
    }
    if let Some(rfc) = non_blank(&customer.rfc) {
        validate_rfc(rfc)?;
    }

    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Users
// =============================================================================

/// Validates a username: 3 to 50 characters, no whitespace.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    required("username", username)?;
    max_len("username", username, 50)?;

    let username = username.trim();
    if username.chars().count() < 3 {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must be at least 3 characters".to_string(),
        });
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Only presence is checked here; the backend owns password policy.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_username(&user.username)?;
    validate_email(&user.email)?;
    validate_password(&user.password)?;
    required("full_name", &user.full_name)?;
    max_len("full_name", &user.full_name, 200)
}

// =============================================================================
// Search
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    max_len("query", query, 100)?;
    Ok(query.trim().to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("CAF-01").is_ok());
        assert!(validate_product_code("product_1").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            name: "Café americano".to_string(),
            code: "CAF-01".to_string(),
            price: Money::from_cents(3500),
            stock: 10,
        };
        assert!(validate_new_product(&product).is_ok());

        product.price = Money::from_cents(-1);
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::OutOfRange { .. })
        ));

        product.price = Money::zero();
        product.stock = -3;
        assert!(validate_new_product(&product).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@@example.com").is_err());
        assert!(validate_email("ana example@x.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_rfc() {
        assert!(validate_rfc("XAXX010101000").is_ok());
        assert!(validate_rfc("ABC010101AB1").is_ok());
        assert!(validate_rfc("ABC").is_err());
        assert!(validate_rfc("XAXX-10101000").is_err());
    }

    #[test]
    fn test_customer_optional_fields() {
        let customer = NewCustomer {
            name: "Mostrador".to_string(),
            email: Some("  ".to_string()),
            ..NewCustomer::default()
        };
        assert!(validate_new_customer(&customer).is_ok());

        let customer = NewCustomer {
            name: "Mostrador".to_string(),
            rfc: Some("nope".to_string()),
            ..NewCustomer::default()
        };
        assert!(validate_new_customer(&customer).is_err());

        let nameless = NewCustomer::default();
        assert_eq!(
            validate_new_customer(&nameless),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_validate_new_user() {
        let user = NewUser {
            username: "seller1".to_string(),
            email: "seller1@example.com".to_string(),
            password: "s3cret".to_string(),
            role: UserRole::Seller,
            full_name: "Luis Gómez".to_string(),
        };
        assert!(validate_new_user(&user).is_ok());

        let no_password = NewUser {
            password: String::new(),
            ..user.clone()
        };
        assert!(validate_new_user(&no_password).is_err());

        assert!(validate_username("ab").is_err());
        assert!(validate_username("two words").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  cash ").unwrap(), "cash");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
