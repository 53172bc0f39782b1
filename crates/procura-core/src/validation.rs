//! # Validation Module
//!
//! Write-time rules for Procura. Everything here runs at the point of edit
//! and blocks the write on failure; the calculators assume these invariants
//! already hold.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation vs. Degraded Input                      │
//! │                                                                         │
//! │  REJECTED (ValidationError, blocks the write)                          │
//! │  ├── Duplicate component SKU within one composite                      │
//! │  ├── quantity_per_kit <= 0 (or NaN)                                    │
//! │  ├── Composite referencing itself                                      │
//! │  └── Negative price / carton count / dimension on a line item          │
//! │                                                                         │
//! │  ACCEPTED WITH WARNING (EngineWarning, see warning.rs)                 │
//! │  ├── Missing stock or cost                                             │
//! │  ├── Missing dimensions or weight                                      │
//! │  └── Empty component list                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use procura_core::validation::{validate_sku, validate_quantity_per_kit};
//!
//! assert!(validate_sku("BOLT-M6").is_ok());
//! assert!(validate_quantity_per_kit(0.0).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::ComponentLink;
use crate::MAX_COMPONENTS_PER_KIT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumerics, hyphens, underscores and dots
///
/// ## Example
/// ```rust
/// use procura_core::validation::validate_sku;
///
/// assert!(validate_sku("KIT-STARTER.v2").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, underscores, and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a product or component display name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a per-kit quantity. Must be finite and strictly positive.
///
/// Fractional values are fine (weight-based components).
pub fn validate_quantity_per_kit(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_per_kit".to_string(),
        });
    }
    Ok(())
}

/// Validates a number that may be zero but never negative or non-finite.
pub fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Like [`validate_non_negative`] for optional fields; `None` is accepted.
pub fn validate_optional_non_negative(field: &str, value: Option<f64>) -> ValidationResult<()> {
    match value {
        Some(v) => validate_non_negative(field, v),
        None => Ok(()),
    }
}

/// Validates currency projection factors: divisor > 0, multiplier >= 0.
pub fn validate_conversion_factors(divisor: f64, multiplier: f64) -> ValidationResult<()> {
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "divisor".to_string(),
        });
    }
    validate_non_negative("multiplier", multiplier)
}

// =============================================================================
// Recipe Validators
// =============================================================================

/// Validates a single component link in isolation.
pub fn validate_component_link(link: &ComponentLink) -> ValidationResult<()> {
    validate_sku(&link.component_sku)?;
    validate_quantity_per_kit(link.quantity_per_kit)?;
    Ok(())
}

/// Validates the full recipe of one composite.
///
/// ## Rules
/// - Each link is individually valid
/// - No two links share a component SKU
/// - No link refers to the composite itself
/// - At most `MAX_COMPONENTS_PER_KIT` links
///
/// An empty recipe is valid: it is degraded input, not an error.
pub fn validate_component_links(
    composite_sku: &str,
    links: &[ComponentLink],
) -> ValidationResult<()> {
    if links.len() > MAX_COMPONENTS_PER_KIT {
        return Err(ValidationError::TooMany {
            field: "components".to_string(),
            max: MAX_COMPONENTS_PER_KIT,
        });
    }

    let composite_sku = composite_sku.trim();
    let mut seen = HashSet::with_capacity(links.len());

    for link in links {
        validate_component_link(link)?;

        let sku = link.component_sku.trim();
        if sku == composite_sku {
            return Err(ValidationError::SelfReference {
                sku: composite_sku.to_string(),
            });
        }
        if !seen.insert(sku) {
            return Err(ValidationError::Duplicate {
                field: "component_sku".to_string(),
                value: sku.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("BOLT-M6").is_ok());
        assert!(validate_sku("part_1").is_ok());
        assert!(validate_sku("KIT.v2").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Starter Kit").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity_per_kit() {
        assert!(validate_quantity_per_kit(1.0).is_ok());
        assert!(validate_quantity_per_kit(0.25).is_ok());

        assert!(validate_quantity_per_kit(0.0).is_err());
        assert!(validate_quantity_per_kit(-2.0).is_err());
        assert!(validate_quantity_per_kit(f64::NAN).is_err());
        assert!(validate_quantity_per_kit(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("unit_price", 0.0).is_ok());
        assert!(validate_non_negative("unit_price", 12.5).is_ok());
        assert!(validate_non_negative("unit_price", -0.01).is_err());
        assert!(validate_optional_non_negative("length_cm", None).is_ok());
        assert!(validate_optional_non_negative("length_cm", Some(-1.0)).is_err());
    }

    #[test]
    fn test_validate_conversion_factors() {
        assert!(validate_conversion_factors(7.1, 1.0).is_ok());
        assert!(validate_conversion_factors(1.0, 0.0).is_ok());
        assert!(validate_conversion_factors(0.0, 1.0).is_err());
        assert!(validate_conversion_factors(f64::NAN, 1.0).is_err());
        assert!(validate_conversion_factors(1.0, -0.5).is_err());
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let links = vec![
            ComponentLink::new("A", "Part A", 1.0),
            ComponentLink::new("A", "Part A again", 2.0),
        ];
        assert_eq!(
            validate_component_links("KIT", &links),
            Err(ValidationError::Duplicate {
                field: "component_sku".to_string(),
                value: "A".to_string(),
            })
        );
    }

    #[test]
    fn test_self_reference_rejected() {
        let links = vec![ComponentLink::new("KIT", "Itself", 1.0)];
        assert!(matches!(
            validate_component_links("KIT", &links),
            Err(ValidationError::SelfReference { .. })
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let links = vec![ComponentLink::new("A", "Part A", 0.0)];
        assert!(validate_component_links("KIT", &links).is_err());
    }

    #[test]
    fn test_empty_recipe_is_valid() {
        assert!(validate_component_links("KIT", &[]).is_ok());
    }
}
