//! # Rate Resolution
//!
//! Builds the rate service a quotation uses for its reference conversion:
//! rates supplied with the request first, then the configured default table.
//!
//! ```text
//! request "rates" {"USD/CNY": 7.2} ──► live ─┐
//!                                            ├──► FallbackRates ──► Quotation
//! procura.toml [currency.default_rates] ─────┘
//! ```

use std::collections::BTreeMap;

use procura_core::{FallbackRates, StaticRates};
use tracing::warn;

use crate::config::{split_pair, CurrencySettings};

/// Converts a "FROM/TO" keyed map into a rate table, skipping bad keys.
pub fn rate_table(rates: &BTreeMap<String, f64>) -> StaticRates {
    let mut table = StaticRates::new();
    for (pair, rate) in rates {
        match split_pair(pair) {
            Some((from, to)) if rate.is_finite() && *rate > 0.0 => table.insert(from, to, *rate),
            _ => warn!(pair = %pair, rate = *rate, "Skipping invalid rate entry"),
        }
    }
    table
}

/// Live rates backed by the configured default table.
pub fn resolve_rates(
    live: &BTreeMap<String, f64>,
    currency: &CurrencySettings,
) -> FallbackRates<StaticRates> {
    FallbackRates::new(rate_table(live), rate_table(&currency.default_rates))
}
