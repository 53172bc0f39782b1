//! Guarded arithmetic shared by the calculators.
//!
//! Every division in the engine goes through here so a zero, negative or
//! non-finite divisor resolves to a neutral value instead of `NaN`/infinity.

/// Clamps a snapshot value to a finite, non-negative number.
#[inline]
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Divides `numerator` by `divisor`, returning `None` when the divisor is not
/// a finite positive number.
#[inline]
pub(crate) fn checked_ratio(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor.is_finite() && divisor > 0.0 && numerator.is_finite() {
        Some(numerator / divisor)
    } else {
        None
    }
}

/// Like [`checked_ratio`] but resolves the guarded case to `0.0`.
#[inline]
pub(crate) fn ratio_or_zero(numerator: f64, divisor: f64) -> f64 {
    checked_ratio(numerator, divisor).unwrap_or(0.0)
}
