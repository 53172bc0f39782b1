//! # Cost Aggregator
//!
//! Rolls component unit costs up into the cost of one kit.
//!
//! ```text
//! per_component_cost[sku] = unit_cost × quantity_per_kit
//! total_cost              = Σ per_component_cost
//! ```
//!
//! No rounding is applied here; presentation rounds. A missing unit cost is
//! treated as 0 and reported with a `MissingCost` warning. Cost is
//! best-effort, never a blocking constraint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::math::non_negative;
use crate::types::ComponentLink;
use crate::warning::EngineWarning;

/// Output of [`compute_kit_cost`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitCost {
    pub per_component_cost: BTreeMap<String, f64>,
    pub total_cost: f64,
    pub warnings: Vec<EngineWarning>,
}

/// Computes per-component and total cost of one kit.
pub fn compute_kit_cost(components: &[ComponentLink]) -> KitCost {
    let mut per_component_cost = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut total_cost = 0.0;

    for link in components {
        if link.unit_cost.is_none() {
            warnings.push(EngineWarning::MissingCost {
                sku: link.component_sku.clone(),
            });
        }
        let cost =
            non_negative(link.unit_cost.unwrap_or(0.0)) * non_negative(link.quantity_per_kit);
        total_cost += cost;
        per_component_cost.insert(link.component_sku.clone(), cost);
    }

    KitCost {
        per_component_cost,
        total_cost,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_kit_cost_rollup() {
        let links = vec![
            ComponentLink::new("A", "Part A", 2.0).with_cost(1.50),
            ComponentLink::new("B", "Part B", 3.0).with_cost(0.80),
        ];
        let cost = compute_kit_cost(&links);

        assert!(approx(cost.per_component_cost["A"], 3.00));
        assert!(approx(cost.per_component_cost["B"], 2.40));
        assert!(approx(cost.total_cost, 5.40));
        assert!(cost.warnings.is_empty());
    }

    #[test]
    fn test_missing_cost_is_zero_with_warning() {
        let links = vec![
            ComponentLink::new("A", "Part A", 2.0).with_cost(1.50),
            ComponentLink::new("B", "Part B", 3.0),
        ];
        let cost = compute_kit_cost(&links);

        assert!(approx(cost.total_cost, 3.00));
        assert_eq!(cost.per_component_cost["B"], 0.0);
        assert_eq!(
            cost.warnings,
            vec![EngineWarning::MissingCost { sku: "B".to_string() }]
        );
    }

    #[test]
    fn test_empty_recipe_costs_nothing() {
        let cost = compute_kit_cost(&[]);
        assert_eq!(cost.total_cost, 0.0);
        assert!(cost.per_component_cost.is_empty());
    }
}
