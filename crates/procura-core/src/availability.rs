//! # Availability Calculator
//!
//! How many complete kits can be assembled from on-hand component stock, and
//! which component is the bottleneck.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each component link (in recipe order):                            │
//! │                                                                         │
//! │      capacity = floor(available_stock / quantity_per_kit)              │
//! │                                                                         │
//! │  producible = min(capacity)                                            │
//! │                                                                         │
//! │  Example:  A  need 2, stock 10  ──► capacity 5                         │
//! │            B  need 3, stock 7   ──► capacity 2  ◄── limiting           │
//! │                                                                         │
//! │            producible = 2                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-break
//! When several components share the minimum capacity, the FIRST one in
//! recipe order is reported as `limiting_component`. The order-dependent
//! rule is kept for output compatibility; `tied_limiting_skus` lists every
//! component at the minimum for callers that want all bottlenecks.
//!
//! ## Empty recipe
//! A composite without components is not a kit yet. That state is reported as
//! [`Producibility::NoRecipe`], never as zero producible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::math::{checked_ratio, non_negative};
use crate::types::ComponentLink;
use crate::warning::EngineWarning;

// =============================================================================
// Result Types
// =============================================================================

/// Producible quantity, keeping "no recipe" distinct from "zero kits".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Producibility {
    /// The composite has no components; producible quantity does not apply.
    NoRecipe,

    /// Whole number of kits that can be assembled (may be 0).
    Kits(u64),
}

impl Producibility {
    /// Returns the kit count, or `None` when there is no recipe.
    pub fn kits(&self) -> Option<u64> {
        match self {
            Producibility::NoRecipe => None,
            Producibility::Kits(n) => Some(*n),
        }
    }

    /// True only when a real recipe yields zero kits.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Producibility::Kits(0))
    }
}

/// Output of [`compute_availability`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Availability {
    pub producible: Producibility,

    /// First component (in recipe order) at the minimum capacity.
    pub limiting_component: Option<ComponentLink>,

    /// Every component whose capacity equals the minimum, in recipe order.
    pub tied_limiting_skus: Vec<String>,

    /// Whole kits each component alone would allow.
    pub per_component_capacity: BTreeMap<String, u64>,

    pub warnings: Vec<EngineWarning>,
}

impl Availability {
    /// SKU of the limiting component, if any.
    pub fn limiting_sku(&self) -> Option<&str> {
        self.limiting_component
            .as_ref()
            .map(|c| c.component_sku.as_str())
    }
}

/// Per-component shortfall for a target number of kits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComponentShortfall {
    pub component_sku: String,
    pub required: f64,
    pub available: f64,
    /// `max(0, required - available)`.
    pub shortfall: f64,
}

// =============================================================================
// Calculations
// =============================================================================

/// Whole kits a single link allows.
///
/// A non-positive or non-finite `quantity_per_kit` resolves to 0 rather than
/// dividing by zero. Missing or negative stock counts as 0.
pub fn component_capacity(link: &ComponentLink) -> u64 {
    let stock = non_negative(link.available_stock.unwrap_or(0.0));
    match checked_ratio(stock, link.quantity_per_kit) {
        // `as` saturates, so huge ratios clamp to u64::MAX
        Some(kits) => kits.floor() as u64,
        None => 0,
    }
}

/// Computes producible kits, the limiting component and per-component
/// capacity.
///
/// Pure function of its argument: stock must already be attached to the
/// links (see [`crate::lookup::attach_snapshot`]). Links without stock are
/// treated as zero stock and produce a `MissingStock` warning.
pub fn compute_availability(components: &[ComponentLink]) -> Availability {
    if components.is_empty() {
        return Availability {
            producible: Producibility::NoRecipe,
            limiting_component: None,
            tied_limiting_skus: Vec::new(),
            per_component_capacity: BTreeMap::new(),
            warnings: vec![EngineWarning::NoRecipe],
        };
    }

    let mut warnings = Vec::new();
    let mut per_component_capacity = BTreeMap::new();
    let mut capacities = Vec::with_capacity(components.len());

    for link in components {
        if link.available_stock.is_none() {
            warnings.push(EngineWarning::MissingStock {
                sku: link.component_sku.clone(),
            });
        }
        let capacity = component_capacity(link);
        per_component_capacity.insert(link.component_sku.clone(), capacity);
        capacities.push(capacity);
    }

    // Strict `<` keeps the first minimum in recipe order.
    let mut limiting_index = 0;
    for (i, capacity) in capacities.iter().enumerate().skip(1) {
        if *capacity < capacities[limiting_index] {
            limiting_index = i;
        }
    }
    let producible = capacities[limiting_index];

    let tied_limiting_skus = components
        .iter()
        .zip(&capacities)
        .filter(|(_, capacity)| **capacity == producible)
        .map(|(link, _)| link.component_sku.clone())
        .collect();

    debug!(
        producible,
        limiting = %components[limiting_index].component_sku,
        "Computed kit availability"
    );

    Availability {
        producible: Producibility::Kits(producible),
        limiting_component: Some(components[limiting_index].clone()),
        tied_limiting_skus,
        per_component_capacity,
        warnings,
    }
}

/// Computes how much of each component is missing to build `target_kits`.
///
/// Order follows the recipe. Components with enough stock report a
/// shortfall of 0.
pub fn compute_shortfall(components: &[ComponentLink], target_kits: u64) -> Vec<ComponentShortfall> {
    components
        .iter()
        .map(|link| {
            let required = non_negative(link.quantity_per_kit) * target_kits as f64;
            let available = non_negative(link.available_stock.unwrap_or(0.0));
            ComponentShortfall {
                component_sku: link.component_sku.clone(),
                required,
                available,
                shortfall: (required - available).max(0.0),
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn link(sku: &str, need: f64, stock: f64) -> ComponentLink {
        ComponentLink::new(sku, format!("Part {}", sku), need).with_stock(stock)
    }

    #[test]
    fn test_bottleneck_scenario() {
        let links = vec![link("A", 2.0, 10.0), link("B", 3.0, 7.0)];
        let result = compute_availability(&links);

        assert_eq!(result.per_component_capacity["A"], 5);
        assert_eq!(result.per_component_capacity["B"], 2);
        assert_eq!(result.producible, Producibility::Kits(2));
        assert_eq!(result.limiting_sku(), Some("B"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_recipe_is_not_zero() {
        let result = compute_availability(&[]);

        assert_eq!(result.producible, Producibility::NoRecipe);
        assert_eq!(result.producible.kits(), None);
        assert!(!result.producible.is_blocked());
        assert!(result.limiting_component.is_none());
        assert_eq!(result.warnings, vec![EngineWarning::NoRecipe]);
    }

    #[test]
    fn test_zero_stock_is_a_real_bottleneck() {
        let links = vec![link("A", 1.0, 0.0), link("B", 1.0, 5.0)];
        let result = compute_availability(&links);

        assert_eq!(result.producible, Producibility::Kits(0));
        assert!(result.producible.is_blocked());
        assert_eq!(result.limiting_sku(), Some("A"));
    }

    #[test]
    fn test_first_minimum_wins_and_ties_are_listed() {
        let links = vec![link("A", 1.0, 9.0), link("B", 2.0, 6.0), link("C", 3.0, 9.0)];
        let result = compute_availability(&links);

        assert_eq!(result.producible, Producibility::Kits(3));
        assert_eq!(result.limiting_sku(), Some("B"));
        assert_eq!(result.tied_limiting_skus, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_fractional_stock_floors() {
        // Weight-based component: 2.75 kg on hand, 0.5 kg per kit
        let links = vec![link("RESIN", 0.5, 2.75)];
        assert_eq!(compute_availability(&links).producible, Producibility::Kits(5));
    }

    #[test]
    fn test_missing_stock_defaults_to_zero_with_warning() {
        let links = vec![ComponentLink::new("A", "Part A", 1.0)];
        let result = compute_availability(&links);

        assert_eq!(result.producible, Producibility::Kits(0));
        assert_eq!(
            result.warnings,
            vec![EngineWarning::MissingStock { sku: "A".to_string() }]
        );
    }

    #[test]
    fn test_invalid_quantity_resolves_to_zero_capacity() {
        assert_eq!(component_capacity(&link("A", 0.0, 10.0)), 0);
        assert_eq!(component_capacity(&link("A", -1.0, 10.0)), 0);
        assert_eq!(component_capacity(&link("A", f64::NAN, 10.0)), 0);
    }

    #[test]
    fn test_monotonic_in_stock_and_need() {
        let base = compute_availability(&[link("A", 2.0, 10.0), link("B", 3.0, 7.0)])
            .producible
            .kits()
            .unwrap();

        for extra in 0..20 {
            let more_stock = compute_availability(&[
                link("A", 2.0, 10.0),
                link("B", 3.0, 7.0 + extra as f64),
            ]);
            assert!(more_stock.producible.kits().unwrap() >= base);

            let more_need = compute_availability(&[
                link("A", 2.0, 10.0),
                link("B", 3.0 + extra as f64, 7.0),
            ]);
            assert!(more_need.producible.kits().unwrap() <= base);
        }
    }

    #[test]
    fn test_producible_is_min_of_floors() {
        let cases = [
            (vec![(2.0, 10.0), (3.0, 7.0)], 2),
            (vec![(1.5, 4.6), (0.2, 100.0)], 3),
            (vec![(4.0, 3.9)], 0),
            (vec![(1.0, 1000.0), (7.0, 70.0), (2.5, 25.0)], 10),
        ];
        for (rows, expected) in cases {
            let links: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(i, (need, stock))| link(&format!("C{}", i), *need, *stock))
                .collect();
            assert_eq!(compute_availability(&links).producible.kits(), Some(expected));
        }
    }

    #[test]
    fn test_shortfall() {
        let links = vec![link("A", 2.0, 10.0), link("B", 3.0, 7.0)];
        let shortfall = compute_shortfall(&links, 4);

        assert_eq!(shortfall[0].required, 8.0);
        assert_eq!(shortfall[0].shortfall, 0.0);
        assert_eq!(shortfall[1].required, 12.0);
        assert_eq!(shortfall[1].available, 7.0);
        assert_eq!(shortfall[1].shortfall, 5.0);
    }
}
