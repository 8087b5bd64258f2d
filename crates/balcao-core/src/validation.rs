//! # Validation Module
//!
//! Field rules applied by the entity constructors.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (JavaScript)                                       │
//! │  └── Blank product name, quantity <= 0, price <= 0                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Constructors (Rust)                                          │
//! │  └── THIS MODULE: required text, column lengths, finite numbers        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (quantity_kind IN ('unit', 'kg'))                           │
//! │  └── Foreign key sale_items.sale_id → sales.id                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use balcao_core::validation::{validate_quantity, validate_required_text};
//!
//! validate_required_text("name", "Mercadinho Central", 100).unwrap();
//! validate_quantity(0.350).unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field.
///
/// ## Rules
/// - Must not be blank (whitespace only counts as blank)
/// - At most `max` characters
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    validate_max_len(field, value, max)
}

/// Validates an optional text field: absent is fine, present must fit.
pub fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(value) => validate_max_len(field, value, max),
        None => Ok(()),
    }
}

fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a content body (unbounded, but required).
pub fn validate_content(content: &str) -> ValidationResult<()> {
    if content.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "content".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sold quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0); fractional values are kilograms
///
/// ## Example
/// ```rust
/// use balcao_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3.0).is_ok());
/// assert!(validate_quantity(0.125).is_ok());
/// assert!(validate_quantity(0.0).is_err());
/// assert!(validate_quantity(f64::NAN).is_err());
/// ```
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    validate_finite("quantity", quantity)?;

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative; zero is allowed (free items)
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    validate_finite("unit_price", price)?;

    if price < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "unit_price".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    Ok(())
}

fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use balcao_core::validation::validate_uuid;
///
/// assert!(validate_uuid("sale_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("sale_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
