//! # Error Types
//!
//! Domain-specific error types for balcao-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  balcao-core errors (this file)                                        │
//! │  ├── CoreError        - Sale / item ownership errors                   │
//! │  └── ValidationError  - Constructor input failures                     │
//! │                                                                         │
//! │  balcao-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → web layer               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recompute operations have no error path; they are plain arithmetic over
//! fields the constructors already validated.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while editing a sale's items in memory.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The item is not owned by the sale being edited.
    ///
    /// ## When This Occurs
    /// - Removing an item id that was never added
    /// - Removing an item twice
    /// - Item id belongs to a different sale
    #[error("Sale item {item_id} not found in sale {sale_id}")]
    SaleItemNotFound { sale_id: String, item_id: String },

    /// An item built for one sale was pushed into another.
    #[error("Sale item {item_id} belongs to sale {item_sale_id}, not {sale_id}")]
    ItemBelongsToOtherSale {
        item_id: String,
        item_sale_id: String,
        sale_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the validated constructors before anything reaches storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (invalid UUID, non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::SaleItemNotFound {
            sale_id: "s-1".to_string(),
            item_id: "i-9".to_string(),
        };
        assert_eq!(err.to_string(), "Sale item i-9 not found in sale s-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        };
        assert_eq!(err.to_string(), "phone must be at most 20 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
