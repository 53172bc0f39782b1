//! # Quotation State
//!
//! The quotation currently open for editing.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Edit                        Command                     Effect         │
//! │  ────                        ───────                     ──────         │
//! │  New row ───────────────────► add_quotation_line() ────► lines.push    │
//! │  Change a cell ─────────────► edit_quotation_line() ───► full recompute│
//! │  Delete row ────────────────► remove_quotation_line() ─► lines.remove  │
//! │  Edit factors ──────────────► set_conversion_factors() ► totals only   │
//! │  View ──────────────────────► get_quotation() ─────────► (read only)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use procura_core::Quotation;
use tracing::warn;

use crate::config::CurrencySettings;

/// Shared handle to the open quotation.
#[derive(Debug, Clone)]
pub struct QuotationState {
    quotation: Arc<Mutex<Quotation>>,
}

impl QuotationState {
    pub fn new(quotation: Quotation) -> Self {
        QuotationState {
            quotation: Arc::new(Mutex::new(quotation)),
        }
    }

    /// Starts an empty quotation in the configured currencies.
    ///
    /// Factors that fail validation are ignored and the identity factors
    /// are kept.
    pub fn from_settings(currency: &CurrencySettings) -> Self {
        let mut quotation = Quotation::new(&currency.base, &currency.secondary);
        if let Err(e) = quotation.set_conversion_factors(currency.factors()) {
            warn!("Configured conversion factors rejected: {}. Using 1/1.", e);
        }
        Self::new(quotation)
    }

    /// Executes a function with read access to the quotation.
    pub fn with_quotation<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Quotation) -> R,
    {
        let quotation = self.quotation.lock().unwrap_or_else(PoisonError::into_inner);
        f(&quotation)
    }

    /// Executes a function with write access to the quotation.
    pub fn with_quotation_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Quotation) -> R,
    {
        let mut quotation = self.quotation.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut quotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::ConversionFactors;

    #[test]
    fn test_from_settings() {
        let mut currency = CurrencySettings::default();
        currency.divisor = 7.1;

        let state = QuotationState::from_settings(&currency);
        state.with_quotation(|q| {
            assert_eq!(q.base_currency(), "CNY");
            assert_eq!(q.secondary_currency(), "USD");
            assert_eq!(q.factors().divisor, 7.1);
        });
    }

    #[test]
    fn test_rejected_factors_fall_back_to_identity() {
        let mut currency = CurrencySettings::default();
        currency.divisor = -1.0;

        let state = QuotationState::from_settings(&currency);
        assert_eq!(state.with_quotation(|q| q.factors()), ConversionFactors::default());
    }
}
