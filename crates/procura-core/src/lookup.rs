//! # External Collaborators
//!
//! Stock levels, unit costs and currency rates are fetched by the caller,
//! often asynchronously and sometimes stale. The engine only sees them
//! through these traits, as explicit parameters; it holds no cache.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller (app layer)                  Engine (this crate)                │
//! │  ──────────────────                  ───────────────────                │
//! │  fetch stock  ──► InventorySnapshot ──► attach_snapshot(links)         │
//! │  fetch costs  ──┘                            │                          │
//! │                                              ▼                          │
//! │                                  compute_availability / kit_cost        │
//! │                                                                         │
//! │  Fresher data arrives?  ──► caller re-invokes. Nothing expires here.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ComponentLink;

// =============================================================================
// Traits
// =============================================================================

/// Stock levels by SKU.
pub trait StockLookup {
    /// Stock on hand, or `None` when the SKU is unknown.
    fn stock_level(&self, sku: &str) -> Option<f64>;

    /// Stock on hand; a missing SKU counts as 0.
    fn get_stock(&self, sku: &str) -> f64 {
        self.stock_level(sku).unwrap_or(0.0)
    }
}

/// Unit costs by SKU.
pub trait CostLookup {
    /// Unit cost, or `None` when the SKU is unknown.
    fn unit_cost(&self, sku: &str) -> Option<f64>;

    /// Unit cost; a missing SKU counts as 0.
    fn get_unit_cost(&self, sku: &str) -> f64 {
        self.unit_cost(sku).unwrap_or(0.0)
    }
}

/// Currency conversion rates.
pub trait RateService {
    /// Units of `to` per one unit of `from`, if known.
    fn rate(&self, from: &str, to: &str) -> Option<f64>;
}

// =============================================================================
// In-Memory Snapshot
// =============================================================================

/// Point-in-time stock and cost values, as handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub stock: HashMap<String, f64>,
    #[serde(default)]
    pub costs: HashMap<String, f64>,
}

impl InventorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(mut self, sku: impl Into<String>, level: f64) -> Self {
        self.stock.insert(sku.into(), level);
        self
    }

    pub fn with_cost(mut self, sku: impl Into<String>, cost: f64) -> Self {
        self.costs.insert(sku.into(), cost);
        self
    }
}

impl StockLookup for InventorySnapshot {
    fn stock_level(&self, sku: &str) -> Option<f64> {
        self.stock.get(sku).copied()
    }
}

impl CostLookup for InventorySnapshot {
    fn unit_cost(&self, sku: &str) -> Option<f64> {
        self.costs.get(sku).copied()
    }
}

/// Fixed rate table keyed by `(from, to)` currency codes.
///
/// Inverse pairs are derived, so storing `USD→CNY` also answers `CNY→USD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticRates {
    rates: HashMap<(String, String), f64>,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.insert(from, to, rate);
        self
    }

    pub fn insert(&mut self, from: &str, to: &str, rate: f64) {
        self.rates
            .insert((from.to_uppercase(), to.to_uppercase()), rate);
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateService for StaticRates {
    fn rate(&self, from: &str, to: &str) -> Option<f64> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        if from == to {
            return Some(1.0);
        }
        if let Some(rate) = self
            .rates
            .get(&(from.clone(), to.clone()))
            .copied()
            .filter(|r| usable_rate(*r))
        {
            return Some(rate);
        }
        self.rates
            .get(&(to, from))
            .copied()
            .filter(|r| usable_rate(*r))
            .map(|r| 1.0 / r)
    }
}

/// A rate is only usable when it is finite and strictly positive.
fn usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Consults a live rate service first, then a fixed default table.
///
/// The default table belongs to the caller (usually loaded from config).
#[derive(Debug, Clone)]
pub struct FallbackRates<R> {
    live: R,
    defaults: StaticRates,
}

impl<R: RateService> FallbackRates<R> {
    pub fn new(live: R, defaults: StaticRates) -> Self {
        FallbackRates { live, defaults }
    }
}

impl<R: RateService> RateService for FallbackRates<R> {
    fn rate(&self, from: &str, to: &str) -> Option<f64> {
        self.live
            .rate(from, to)
            .filter(|r| usable_rate(*r))
            .or_else(|| self.defaults.rate(from, to))
    }
}

// =============================================================================
// Snapshot Attachment
// =============================================================================

/// Copies stock and cost values from lookups onto component links.
///
/// Values the lookups do not know are left as `None`, so the calculators can
/// warn about them; anything already attached is overwritten.
pub fn attach_snapshot<S, C>(links: &mut [ComponentLink], stock: &S, cost: &C)
where
    S: StockLookup + ?Sized,
    C: CostLookup + ?Sized,
{
    for link in links.iter_mut() {
        link.available_stock = stock.stock_level(&link.component_sku);
        link.unit_cost = cost.unit_cost(&link.component_sku);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
