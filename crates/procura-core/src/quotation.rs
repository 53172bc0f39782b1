//! # Quotation Totals
//!
//! Derived per-line and grand totals for a purchase quotation.
//!
//! ## Recompute Pipeline
//! Every edit re-runs the whole pipeline for every line, then the grand
//! totals. Derived values are never edited directly, so they cannot drift
//! from the base fields.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Base fields (LineItemInput)          Derived (LineTotals), in order   │
//! │  ───────────────────────────          ──────────────────────────────   │
//! │  length_cm × width_cm × height_cm ──► 1. unit_volume   (/ 1,000,000)   │
//! │  cartons_ordered ─────────────────► 2. total_volume  = 1 × cartons    │
//! │  unit_weight_grams × units/carton ──► 3. total_weight  (/ 1,000)       │
//! │  units_per_carton × cartons ──────► 4. total_quantity                 │
//! │  unit_price ──────────────────────► 5. total_value   = price × 4      │
//! │                                                                         │
//! │  6. Grand totals = Σ lines                                             │
//! │     projected_total = total_value / divisor × multiplier              │
//! │     reference_total = total_value × reference rate (if known)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing dimensions or weight are degraded input: the affected value is
//! taken as 0 and a warning is attached to the line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::container::{allocate, AllocationResult};
use crate::currency::{reference_conversion, ConversionFactors};
use crate::error::{CoreError, CoreResult};
use crate::lookup::RateService;
use crate::types::ContainerTypeProfile;
use crate::validation::{validate_non_negative, validate_optional_non_negative, validate_sku};
use crate::warning::EngineWarning;
use crate::{CM3_PER_M3, GRAMS_PER_KG};

// =============================================================================
// Line Items
// =============================================================================

/// Base fields of a quotation line. The only editable part of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemInput {
    pub sku: String,

    #[serde(default)]
    pub name: String,

    /// Price per unit in the quotation's base currency.
    pub unit_price: f64,

    pub units_per_carton: u32,

    pub cartons_ordered: u32,

    #[serde(default)]
    pub unit_weight_grams: Option<f64>,

    /// Carton dimensions in centimeters.
    #[serde(default)]
    pub length_cm: Option<f64>,
    #[serde(default)]
    pub width_cm: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

impl LineItemInput {
    pub fn new(sku: impl Into<String>, unit_price: f64, units_per_carton: u32, cartons_ordered: u32) -> Self {
        LineItemInput {
            sku: sku.into(),
            name: String::new(),
            unit_price,
            units_per_carton,
            cartons_ordered,
            unit_weight_grams: None,
            length_cm: None,
            width_cm: None,
            height_cm: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_weight(mut self, grams: f64) -> Self {
        self.unit_weight_grams = Some(grams);
        self
    }

    pub fn with_dimensions(mut self, length_cm: f64, width_cm: f64, height_cm: f64) -> Self {
        self.length_cm = Some(length_cm);
        self.width_cm = Some(width_cm);
        self.height_cm = Some(height_cm);
        self
    }

    /// Write-time checks. Missing dimensions and weight are allowed.
    pub fn validate(&self) -> CoreResult<()> {
        validate_sku(&self.sku)?;
        validate_non_negative("unit_price", self.unit_price)?;
        validate_optional_non_negative("unit_weight_grams", self.unit_weight_grams)?;
        validate_optional_non_negative("length_cm", self.length_cm)?;
        validate_optional_non_negative("width_cm", self.width_cm)?;
        validate_optional_non_negative("height_cm", self.height_cm)?;
        Ok(())
    }

    fn dimensions(&self) -> Option<(f64, f64, f64)> {
        match (self.length_cm, self.width_cm, self.height_cm) {
            (Some(l), Some(w), Some(h)) if l > 0.0 && w > 0.0 && h > 0.0 => Some((l, w, h)),
            _ => None,
        }
    }

    fn weight_grams(&self) -> Option<f64> {
        self.unit_weight_grams.filter(|g| g.is_finite() && *g > 0.0)
    }
}

/// A single base-field edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LineField {
    Sku(String),
    Name(String),
    UnitPrice(f64),
    UnitsPerCarton(u32),
    CartonsOrdered(u32),
    UnitWeightGrams(Option<f64>),
    LengthCm(Option<f64>),
    WidthCm(Option<f64>),
    HeightCm(Option<f64>),
}

fn trim_identity(input: &mut LineItemInput) {
    input.sku = input.sku.trim().to_string();
    input.name = input.name.trim().to_string();
}

impl LineField {
    fn apply_to(self, input: &mut LineItemInput) {
        match self {
            LineField::Sku(v) => input.sku = v.trim().to_string(),
            LineField::Name(v) => input.name = v.trim().to_string(),
            LineField::UnitPrice(v) => input.unit_price = v,
            LineField::UnitsPerCarton(v) => input.units_per_carton = v,
            LineField::CartonsOrdered(v) => input.cartons_ordered = v,
            LineField::UnitWeightGrams(v) => input.unit_weight_grams = v,
            LineField::LengthCm(v) => input.length_cm = v,
            LineField::WidthCm(v) => input.width_cm = v,
            LineField::HeightCm(v) => input.height_cm = v,
        }
    }
}

/// Values derived from one line's base fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineTotals {
    /// m³ per carton.
    pub unit_volume: f64,
    /// m³.
    pub total_volume: f64,
    /// kg.
    pub total_weight: f64,
    pub total_quantity: u64,
    pub total_value: f64,
}

/// Runs the line pipeline in its fixed order.
///
/// ```rust
/// use procura_core::quotation::{recompute_line, LineItemInput};
///
/// let input = LineItemInput::new("BOX-1", 2.5, 12, 5).with_dimensions(30.0, 20.0, 10.0);
/// let totals = recompute_line(&input);
///
/// assert!((totals.unit_volume - 0.006).abs() < 1e-12);
/// assert!((totals.total_volume - 0.03).abs() < 1e-12);
/// assert_eq!(totals.total_quantity, 60);
/// ```
pub fn recompute_line(input: &LineItemInput) -> LineTotals {
    let cartons = f64::from(input.cartons_ordered);
    let units_per_carton = f64::from(input.units_per_carton);

    let unit_volume = input
        .dimensions()
        .map(|(l, w, h)| l * w * h / CM3_PER_M3)
        .unwrap_or(0.0);
    let total_volume = unit_volume * cartons;
    let total_weight = input
        .weight_grams()
        .map(|g| g * units_per_carton * cartons / GRAMS_PER_KG)
        .unwrap_or(0.0);
    let total_quantity = u64::from(input.units_per_carton) * u64::from(input.cartons_ordered);
    let total_value = input.unit_price * total_quantity as f64;

    LineTotals {
        unit_volume,
        total_volume,
        total_weight,
        total_quantity,
        total_value,
    }
}

/// Degraded-input warnings for one line.
pub fn line_warnings(line_id: &str, input: &LineItemInput) -> Vec<EngineWarning> {
    let mut warnings = Vec::new();
    if input.dimensions().is_none() {
        warnings.push(EngineWarning::DimensionsMissing {
            line_id: line_id.to_string(),
        });
    }
    if input.weight_grams().is_none() {
        warnings.push(EngineWarning::WeightMissing {
            line_id: line_id.to_string(),
        });
    }
    warnings
}

/// One quotation line: base fields plus the totals derived from them.
///
/// Totals are private and only written by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct QuotationLineItem {
    id: String,
    input: LineItemInput,
    totals: LineTotals,
    warnings: Vec<EngineWarning>,
}

impl QuotationLineItem {
    fn new(input: LineItemInput) -> Self {
        let mut line = QuotationLineItem {
            id: Uuid::new_v4().to_string(),
            input,
            totals: LineTotals::default(),
            warnings: Vec::new(),
        };
        line.recompute();
        line
    }

    fn recompute(&mut self) {
        self.totals = recompute_line(&self.input);
        self.warnings = line_warnings(&self.id, &self.input);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn input(&self) -> &LineItemInput {
        &self.input
    }

    pub fn totals(&self) -> &LineTotals {
        &self.totals
    }

    pub fn warnings(&self) -> &[EngineWarning] {
        &self.warnings
    }
}

// =============================================================================
// Grand Totals
// =============================================================================

/// Sums over every line plus the currency projections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationTotals {
    pub line_count: usize,
    pub unit_volume: f64,
    pub total_volume: f64,
    pub total_weight: f64,
    pub total_quantity: u64,
    /// Base currency.
    pub total_value: f64,
    /// Secondary currency via the conversion factors. `None` if the divisor
    /// is unusable.
    pub projected_total: Option<f64>,
    /// Secondary currency via the reference rate, when one is known.
    pub reference_total: Option<f64>,
}

// =============================================================================
// Quotation
// =============================================================================

/// An editable quotation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Quotation {
    id: String,
    base_currency: String,
    secondary_currency: String,
    factors: ConversionFactors,
    reference_rate: Option<f64>,
    lines: Vec<QuotationLineItem>,
    totals: QuotationTotals,
    warnings: Vec<EngineWarning>,
    #[ts(as = "String")]
    updated_at: DateTime<Utc>,
}

impl Quotation {
    pub fn new(base_currency: impl Into<String>, secondary_currency: impl Into<String>) -> Self {
        let base_currency: String = base_currency.into();
        let secondary_currency: String = secondary_currency.into();
        let mut quotation = Quotation {
            id: Uuid::new_v4().to_string(),
            base_currency: base_currency.trim().to_uppercase(),
            secondary_currency: secondary_currency.trim().to_uppercase(),
            factors: ConversionFactors::default(),
            reference_rate: None,
            lines: Vec::new(),
            totals: QuotationTotals::default(),
            warnings: Vec::new(),
            updated_at: Utc::now(),
        };
        quotation.recompute();
        quotation
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn secondary_currency(&self) -> &str {
        &self.secondary_currency
    }

    pub fn factors(&self) -> ConversionFactors {
        self.factors
    }

    pub fn reference_rate(&self) -> Option<f64> {
        self.reference_rate
    }

    pub fn lines(&self) -> &[QuotationLineItem] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&QuotationLineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn totals(&self) -> &QuotationTotals {
        &self.totals
    }

    /// Warnings of every line, in line order.
    pub fn warnings(&self) -> &[EngineWarning] {
        &self.warnings
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Appends a line and returns it with its derived totals.
    pub fn add_line(&mut self, mut input: LineItemInput) -> CoreResult<&QuotationLineItem> {
        trim_identity(&mut input);
        input.validate()?;

        let line = QuotationLineItem::new(input);
        debug!(line = %line.id, sku = %line.input.sku, "Added quotation line");
        self.lines.push(line);
        self.recompute();

        let index = self.lines.len() - 1;
        Ok(&self.lines[index])
    }

    /// Replaces all base fields of a line.
    pub fn update_line(&mut self, id: &str, mut input: LineItemInput) -> CoreResult<&QuotationLineItem> {
        trim_identity(&mut input);
        input.validate()?;

        let index = self.index_of(id)?;
        self.lines[index].input = input;
        debug!(line = %id, "Updated quotation line");
        self.recompute();
        Ok(&self.lines[index])
    }

    /// Applies a single field edit. An invalid edit leaves the line unchanged.
    pub fn edit_line(&mut self, id: &str, field: LineField) -> CoreResult<&QuotationLineItem> {
        let index = self.index_of(id)?;

        let mut input = self.lines[index].input.clone();
        field.apply_to(&mut input);
        input.validate()?;

        self.lines[index].input = input;
        debug!(line = %id, "Edited quotation line field");
        self.recompute();
        Ok(&self.lines[index])
    }

    pub fn remove_line(&mut self, id: &str) -> CoreResult<QuotationLineItem> {
        let index = self.index_of(id)?;
        let removed = self.lines.remove(index);
        debug!(line = %id, "Removed quotation line");
        self.recompute();
        Ok(removed)
    }

    pub fn set_conversion_factors(&mut self, factors: ConversionFactors) -> CoreResult<()> {
        factors.validate()?;
        self.factors = factors;
        self.recompute();
        Ok(())
    }

    /// Sets (or clears) the reference rate: secondary units per base unit.
    pub fn set_reference_rate(&mut self, rate: Option<f64>) {
        self.reference_rate = rate.filter(|r| r.is_finite() && *r > 0.0);
        self.recompute();
    }

    /// Pulls the reference rate for this quotation's currency pair.
    pub fn refresh_reference_rate<R: RateService + ?Sized>(&mut self, rates: &R) {
        let rate = rates.rate(&self.base_currency, &self.secondary_currency);
        if rate.is_none() {
            warn!(
                from = %self.base_currency,
                to = %self.secondary_currency,
                "No reference rate available"
            );
        }
        self.set_reference_rate(rate);
    }

    /// Splits the quotation's cargo across containers of `profile`.
    pub fn allocate(&self, profile: &ContainerTypeProfile) -> AllocationResult {
        allocate(self.totals.total_volume, self.totals.total_weight, profile)
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::LineItemNotFound(id.to_string()))
    }

    fn recompute(&mut self) {
        let mut totals = QuotationTotals {
            line_count: self.lines.len(),
            ..QuotationTotals::default()
        };
        let mut warnings = Vec::new();

        for line in &mut self.lines {
            line.recompute();

            totals.unit_volume += line.totals.unit_volume;
            totals.total_volume += line.totals.total_volume;
            totals.total_weight += line.totals.total_weight;
            totals.total_quantity += line.totals.total_quantity;
            totals.total_value += line.totals.total_value;
            warnings.extend(line.warnings.iter().cloned());
        }

        totals.projected_total = self.factors.project(totals.total_value);
        totals.reference_total = reference_conversion(totals.total_value, self.reference_rate);

        debug!(
            lines = totals.line_count,
            total_volume = totals.total_volume,
            total_weight = totals.total_weight,
            total_value = totals.total_value,
            "Recomputed quotation totals"
        );

        self.totals = totals;
        self.warnings = warnings;
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StaticRates;

    const EPS: f64 = 1e-9;

    fn carton_line() -> LineItemInput {
        LineItemInput::new("BOX-1", 2.5, 12, 5)
            .with_name("Gift box")
            .with_weight(250.0)
            .with_dimensions(30.0, 20.0, 10.0)
    }

    #[test]
    fn test_line_pipeline() {
        let totals = recompute_line(&carton_line());

        assert!((totals.unit_volume - 0.006).abs() < EPS);
        assert!((totals.total_volume - 0.03).abs() < EPS);
        // 250 g × 12 × 5 = 15 kg
        assert!((totals.total_weight - 15.0).abs() < EPS);
        assert_eq!(totals.total_quantity, 60);
        assert!((totals.total_value - 150.0).abs() < EPS);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let input = carton_line();
        let first = recompute_line(&input);
        let second = recompute_line(&input);

        assert_eq!(first.unit_volume.to_bits(), second.unit_volume.to_bits());
        assert_eq!(first.total_volume.to_bits(), second.total_volume.to_bits());
        assert_eq!(first.total_weight.to_bits(), second.total_weight.to_bits());
        assert_eq!(first.total_value.to_bits(), second.total_value.to_bits());

        let mut quotation = Quotation::new("CNY", "USD");
        let id = quotation.add_line(input.clone()).unwrap().id().to_string();
        let before = quotation.totals().clone();
        quotation.update_line(&id, input).unwrap();
        assert_eq!(quotation.totals(), &before);
    }

    #[test]
    fn test_missing_dimensions_and_weight_warn() {
        let input = LineItemInput::new("BOX-2", 1.0, 10, 2).with_dimensions(30.0, 0.0, 10.0);
        let mut quotation = Quotation::new("CNY", "USD");
        let line = quotation.add_line(input).unwrap();

        assert_eq!(line.totals().unit_volume, 0.0);
        assert_eq!(line.totals().total_weight, 0.0);
        assert_eq!(line.totals().total_quantity, 20);

        let id = line.id().to_string();
        assert_eq!(
            quotation.warnings(),
            &[
                EngineWarning::DimensionsMissing { line_id: id.clone() },
                EngineWarning::WeightMissing { line_id: id },
            ]
        );
    }

    #[test]
    fn test_field_edit_rederives_everything() {
        let mut quotation = Quotation::new("CNY", "USD");
        let id = quotation.add_line(carton_line()).unwrap().id().to_string();

        quotation.edit_line(&id, LineField::CartonsOrdered(10)).unwrap();

        let line = quotation.line(&id).unwrap();
        assert!((line.totals().total_volume - 0.06).abs() < EPS);
        assert!((line.totals().total_weight - 30.0).abs() < EPS);
        assert_eq!(line.totals().total_quantity, 120);
        assert!((quotation.totals().total_value - 300.0).abs() < EPS);
    }

    #[test]
    fn test_sku_and_name_are_trimmed() {
        let mut quotation = Quotation::new("CNY", "USD");
        let id = quotation
            .add_line(carton_line().with_name("  Gift Box "))
            .unwrap()
            .id()
            .to_string();
        assert_eq!(quotation.line(&id).unwrap().input().name, "Gift Box");

        quotation
            .edit_line(&id, LineField::Name("\tLarge Gift Box  ".to_string()))
            .unwrap();
        quotation
            .edit_line(&id, LineField::Sku(" BOX-9 ".to_string()))
            .unwrap();

        let input = quotation.line(&id).unwrap().input();
        assert_eq!(input.name, "Large Gift Box");
        assert_eq!(input.sku, "BOX-9");
    }

    #[test]
    fn test_invalid_edit_is_rejected_and_leaves_line_unchanged() {
        let mut quotation = Quotation::new("CNY", "USD");
        let id = quotation.add_line(carton_line()).unwrap().id().to_string();

        assert!(quotation.edit_line(&id, LineField::UnitPrice(-1.0)).is_err());
        assert_eq!(quotation.line(&id).unwrap().input().unit_price, 2.5);
        assert!(matches!(
            quotation.edit_line("missing", LineField::UnitPrice(1.0)),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    #[test]
    fn test_grand_totals_and_removal() {
        let mut quotation = Quotation::new("CNY", "USD");
        quotation.add_line(carton_line()).unwrap();
        let second = quotation
            .add_line(LineItemInput::new("BOX-3", 10.0, 1, 3).with_weight(1000.0))
            .unwrap()
            .id()
            .to_string();

        let totals = quotation.totals();
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 63);
        assert!((totals.total_weight - 18.0).abs() < EPS);
        assert!((totals.total_value - 180.0).abs() < EPS);

        quotation.remove_line(&second).unwrap();
        assert_eq!(quotation.totals().line_count, 1);
        assert!((quotation.totals().total_value - 150.0).abs() < EPS);
        assert!(quotation.remove_line(&second).is_err());
    }

    #[test]
    fn test_currency_projection_and_reference() {
        let mut quotation = Quotation::new("cny", "usd");
        quotation.add_line(carton_line()).unwrap();

        quotation
            .set_conversion_factors(ConversionFactors::new(7.5, 1.0))
            .unwrap();
        assert!((quotation.totals().projected_total.unwrap() - 20.0).abs() < EPS);
        assert_eq!(quotation.totals().reference_total, None);

        assert!(quotation
            .set_conversion_factors(ConversionFactors::new(0.0, 1.0))
            .is_err());
        assert_eq!(quotation.factors().divisor, 7.5);

        let rates = StaticRates::new().with_rate("USD", "CNY", 8.0);
        quotation.refresh_reference_rate(&rates);
        assert_eq!(quotation.reference_rate(), Some(0.125));
        assert!((quotation.totals().reference_total.unwrap() - 18.75).abs() < EPS);
    }

    #[test]
    fn test_allocate_from_grand_totals() {
        let mut quotation = Quotation::new("CNY", "USD");
        // 50 cartons of 1 m³ each
        quotation
            .add_line(
                LineItemInput::new("CRATE", 100.0, 1, 50)
                    .with_weight(200_000.0)
                    .with_dimensions(100.0, 100.0, 100.0),
            )
            .unwrap();

        let result = quotation.allocate(&ContainerTypeProfile::twenty_foot());
        assert_eq!(result.containers_needed(), 2);
        assert_eq!(result.active_container_index, Some(1));
        assert!((result.total_volume_assigned() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_quotation() {
        let quotation = Quotation::new("CNY", "USD");
        assert_eq!(quotation.totals().line_count, 0);
        assert_eq!(quotation.totals().projected_total, Some(0.0));
        assert!(quotation.allocate(&ContainerTypeProfile::forty_foot()).is_empty());
    }

    #[test]
    fn test_line_field_json_shape() {
        let field: LineField =
            serde_json::from_str(r#"{"field":"cartons_ordered","value":8}"#).unwrap();
        assert_eq!(field, LineField::CartonsOrdered(8));

        let cleared: LineField =
            serde_json::from_str(r#"{"field":"length_cm","value":null}"#).unwrap();
        assert_eq!(cleared, LineField::LengthCm(None));
    }
}
