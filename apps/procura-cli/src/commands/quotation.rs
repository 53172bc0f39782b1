//! # Quotation Commands
//!
//! Line-item edits on the open quotation. Every command returns the whole
//! quotation so the caller always renders totals consistent with the lines.

use std::collections::BTreeMap;

use procura_core::{ConversionFactors, LineField, LineItemInput, Quotation};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::rates::resolve_rates;
use crate::state::QuotationState;

/// A quotation as submitted in one piece (e.g. a JSON file).
///
/// Currencies and factors default to the configured ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationDocument {
    #[serde(default)]
    pub base_currency: Option<String>,

    #[serde(default)]
    pub secondary_currency: Option<String>,

    #[serde(default)]
    pub factors: Option<ConversionFactors>,

    /// Live rates keyed "FROM/TO"; configured defaults fill the gaps.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,

    #[serde(default)]
    pub lines: Vec<LineItemInput>,

    /// Container code for allocation; the configured default if absent.
    #[serde(default)]
    pub container: Option<String>,
}

/// Builds a quotation from a document, applying every line in order.
pub fn open_quotation(
    config: &AppConfig,
    document: QuotationDocument,
) -> Result<QuotationState, ApiError> {
    let base = document
        .base_currency
        .unwrap_or_else(|| config.currency.base.clone());
    let secondary = document
        .secondary_currency
        .unwrap_or_else(|| config.currency.secondary.clone());

    let mut quotation = Quotation::new(base, secondary);
    quotation.set_conversion_factors(document.factors.unwrap_or_else(|| config.currency.factors()))?;

    for line in document.lines {
        quotation.add_line(line)?;
    }

    let state = QuotationState::new(quotation);
    refresh_reference_rate(&state, config, &document.rates);

    info!(
        lines = state.with_quotation(|q| q.lines().len()),
        "Opened quotation"
    );
    Ok(state)
}

pub fn get_quotation(quotation: &QuotationState) -> Quotation {
    quotation.with_quotation(|q| q.clone())
}

pub fn add_quotation_line(
    quotation: &QuotationState,
    input: LineItemInput,
) -> Result<Quotation, ApiError> {
    debug!(sku = %input.sku, "add_quotation_line command");
    quotation.with_quotation_mut(|q| {
        q.add_line(input)?;
        Ok::<_, ApiError>(q.clone())
    })
}

pub fn update_quotation_line(
    quotation: &QuotationState,
    id: &str,
    input: LineItemInput,
) -> Result<Quotation, ApiError> {
    debug!(line = %id, "update_quotation_line command");
    quotation.with_quotation_mut(|q| {
        q.update_line(id, input)?;
        Ok::<_, ApiError>(q.clone())
    })
}

pub fn edit_quotation_line(
    quotation: &QuotationState,
    id: &str,
    field: LineField,
) -> Result<Quotation, ApiError> {
    debug!(line = %id, ?field, "edit_quotation_line command");
    quotation.with_quotation_mut(|q| {
        q.edit_line(id, field)?;
        Ok::<_, ApiError>(q.clone())
    })
}

pub fn remove_quotation_line(quotation: &QuotationState, id: &str) -> Result<Quotation, ApiError> {
    debug!(line = %id, "remove_quotation_line command");
    quotation.with_quotation_mut(|q| {
        q.remove_line(id)?;
        Ok::<_, ApiError>(q.clone())
    })
}

pub fn set_conversion_factors(
    quotation: &QuotationState,
    factors: ConversionFactors,
) -> Result<Quotation, ApiError> {
    debug!(divisor = factors.divisor, multiplier = factors.multiplier, "set_conversion_factors command");
    quotation.with_quotation_mut(|q| {
        q.set_conversion_factors(factors)?;
        Ok::<_, ApiError>(q.clone())
    })
}

/// Re-reads the reference rate: `live` first, then the configured table.
pub fn refresh_reference_rate(
    quotation: &QuotationState,
    config: &AppConfig,
    live: &BTreeMap<String, f64>,
) -> Quotation {
    let rates = resolve_rates(live, &config.currency);
    quotation.with_quotation_mut(|q| {
        q.refresh_reference_rate(&rates);
        q.clone()
    })
}
