//! # Error Types
//!
//! Domain-specific error types for procura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  procura-core errors (this file)                                       │
//! │  ├── CoreError        - Lookups that miss, wrapped validation          │
//! │  └── ValidationError  - Rejected writes (block the edit)               │
//! │                                                                         │
//! │  procura-cli errors (app crate)                                        │
//! │  ├── ConfigError      - Config file load/save failures                 │
//! │  └── ApiError         - What callers see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Degraded input (missing stock, missing dimensions, empty recipe) is NOT an
//! error. It produces an [`EngineWarning`](crate::warning::EngineWarning)
//! next to a best-effort result.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core engine errors.
///
/// Raised by the stateful edit surfaces (registry, quotation). The pure
/// computations never fail.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Composite product is not registered.
    #[error("Composite not found: {0}")]
    CompositeNotFound(String),

    /// Component is not part of the composite's recipe.
    #[error("Component {component} is not part of composite {composite}")]
    ComponentNotFound { composite: String, component: String },

    /// Quotation line item cannot be found.
    #[error("Quotation line not found: {0}")]
    LineItemNotFound(String),

    /// Container code is not in the fixed catalog.
    #[error("Unknown container type: {0}")]
    UnknownContainerType(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Write-time validation errors.
///
/// These are surfaced at the point of edit and block the write. Nothing that
/// fails here ever reaches the engine.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Duplicate value (e.g., the same component SKU twice in one recipe).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A composite lists itself as one of its own components.
    #[error("Composite {sku} cannot be a component of itself")]
    SelfReference { sku: String },

    /// A composite is used as a component of another composite.
    #[error("Composite {component} cannot be used as a component of {composite}")]
    NestedComposite { composite: String, component: String },

    /// Too many entries in a collection.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
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
        let err = CoreError::ComponentNotFound {
            composite: "KIT-01".to_string(),
            component: "BOLT-M6".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Component BOLT-M6 is not part of composite KIT-01"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::SelfReference {
            sku: "KIT-01".to_string(),
        };
        assert_eq!(err.to_string(), "Composite KIT-01 cannot be a component of itself");

        let err = ValidationError::MustBePositive {
            field: "quantity_per_kit".to_string(),
        };
        assert_eq!(err.to_string(), "quantity_per_kit must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
