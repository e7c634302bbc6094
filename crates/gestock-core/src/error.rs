//! # Error Types
//!
//! Domain-specific error types for gestock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gestock-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gestock-client errors (separate crate)                                │
//! │  └── ClientError      - HTTP, storage, config failures + CoreError     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user-facing text    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Import problems are not errors: they are collected per row in
//! [`crate::validation::ImportReport`] so the rest of the batch proceeds.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not in the local cache.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale form (qty: 60)
    ///      │
    ///      ▼
    /// Check cached stock: available=50
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Riz 25kg", available: 50, requested: 60 }
    ///      │
    ///      ▼
    /// No network call is made
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value could not be read as a number.
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Invalid format (e.g. invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
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
        let err = CoreError::InsufficientStock {
            product: "Riz 25kg".to_string(),
            available: 50,
            requested: 60,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Riz 25kg: available 50, requested 60"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity is required");

        let err = ValidationError::InvalidNumber {
            field: "prix_achat".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "prix_achat is not a valid number: 'abc'");
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
