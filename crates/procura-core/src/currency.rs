//! # Currency Projection
//!
//! Quotations are priced in a base currency. Secondary-currency totals are
//! projected with user-editable conversion factors, NOT a live market rate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  projected_total = total_value / divisor × multiplier                  │
//! │                                                                         │
//! │  e.g. base CNY, secondary USD, buyer uses a negotiated 7.10 rate       │
//! │       divisor = 7.10, multiplier = 1.0                                 │
//! │       ¥ 71,000.00  ──►  $ 10,000.00                                    │
//! │                                                                         │
//! │  reference_total = total_value × live_rate   (shown alongside only)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The live rate comes from a [`RateService`](crate::lookup::RateService)
//! owned by the caller; the engine only multiplies by what it is given.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::math::checked_ratio;
use crate::validation::validate_conversion_factors;

/// User-editable factors for the secondary-currency projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConversionFactors {
    /// Base amount is divided by this (must be > 0).
    pub divisor: f64,
    /// Then multiplied by this (must be >= 0).
    pub multiplier: f64,
}

impl Default for ConversionFactors {
    fn default() -> Self {
        ConversionFactors {
            divisor: 1.0,
            multiplier: 1.0,
        }
    }
}

impl ConversionFactors {
    pub fn new(divisor: f64, multiplier: f64) -> Self {
        ConversionFactors {
            divisor,
            multiplier,
        }
    }

    /// Projects a base-currency amount.
    ///
    /// Returns `None` when the divisor is zero, negative or not finite.
    ///
    /// ```rust
    /// use procura_core::currency::ConversionFactors;
    ///
    /// let factors = ConversionFactors::new(7.10, 1.0);
    /// let usd = factors.project(71_000.0).unwrap();
    /// assert!((usd - 10_000.0).abs() < 1e-6);
    ///
    /// assert_eq!(ConversionFactors::new(0.0, 1.0).project(10.0), None);
    /// ```
    pub fn project(&self, amount: f64) -> Option<f64> {
        if !self.multiplier.is_finite() {
            return None;
        }
        checked_ratio(amount, self.divisor).map(|v| v * self.multiplier)
    }

    /// Write-time check used when a user edits the factors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_conversion_factors(self.divisor, self.multiplier)
    }
}

/// Converts with a reference rate, if one is available.
pub fn reference_conversion(amount: f64, rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
        .map(|r| amount * r)
}
