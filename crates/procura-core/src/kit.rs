//! # Kit Evaluation
//!
//! Runs availability and cost over one registered composite and a snapshot
//! of stock and cost, gathering every warning into a single report.
//!
//! ```text
//! CompositeProduct ──► attach_snapshot(stock, cost) ──┬──► compute_availability
//!                                                     └──► compute_kit_cost
//!                                                              │
//!                                                              ▼
//!                                                          KitReport
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::availability::{compute_availability, Availability};
use crate::cost::{compute_kit_cost, KitCost};
use crate::lookup::{attach_snapshot, CostLookup, StockLookup};
use crate::types::CompositeProduct;
use crate::warning::EngineWarning;

/// Availability and cost of one kit at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitReport {
    pub composite_sku: String,
    pub composite_name: String,
    pub availability: Availability,
    pub cost: KitCost,

    /// Availability warnings followed by cost warnings.
    pub warnings: Vec<EngineWarning>,
}

impl KitReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Evaluates a composite against the given stock and cost lookups.
///
/// The composite itself is not modified; snapshot values are attached to a
/// copy of its links.
pub fn evaluate_kit<S, C>(composite: &CompositeProduct, stock: &S, cost: &C) -> KitReport
where
    S: StockLookup + ?Sized,
    C: CostLookup + ?Sized,
{
    let mut links = composite.components.clone();
    attach_snapshot(&mut links, stock, cost);

    let availability = compute_availability(&links);
    let cost = compute_kit_cost(&links);

    let warnings: Vec<EngineWarning> = availability
        .warnings
        .iter()
        .chain(cost.warnings.iter())
        .cloned()
        .collect();

    if !warnings.is_empty() {
        warn!(
            sku = %composite.sku,
            warnings = warnings.len(),
            "Kit evaluated with degraded input"
        );
    }

    KitReport {
        composite_sku: composite.sku.clone(),
        composite_name: composite.name.clone(),
        availability,
        cost,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::Producibility;
    use crate::lookup::InventorySnapshot;
    use crate::types::ComponentLink;

    fn starter_kit() -> CompositeProduct {
        CompositeProduct::new("KIT-01", "Starter Kit")
            .with_component(ComponentLink::new("A", "Part A", 2.0))
            .with_component(ComponentLink::new("B", "Part B", 3.0))
    }

    #[test]
    fn test_evaluate_kit_full_snapshot() {
        let snapshot = InventorySnapshot::new()
            .with_stock("A", 10.0)
            .with_stock("B", 7.0)
            .with_cost("A", 1.50)
            .with_cost("B", 0.80);

        let report = evaluate_kit(&starter_kit(), &snapshot, &snapshot);

        assert_eq!(report.composite_sku, "KIT-01");
        assert_eq!(report.availability.producible, Producibility::Kits(2));
        assert_eq!(report.availability.limiting_sku(), Some("B"));
        assert!((report.cost.total_cost - 5.40).abs() < 1e-9);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_evaluate_kit_with_stale_snapshot() {
        let snapshot = InventorySnapshot::new().with_stock("A", 10.0);
        let report = evaluate_kit(&starter_kit(), &snapshot, &snapshot);

        assert_eq!(report.availability.producible, Producibility::Kits(0));
        assert_eq!(
            report.warnings,
            vec![
                EngineWarning::MissingStock { sku: "B".to_string() },
                EngineWarning::MissingCost { sku: "A".to_string() },
                EngineWarning::MissingCost { sku: "B".to_string() },
            ]
        );
    }

    #[test]
    fn test_evaluate_kit_without_recipe() {
        let empty = CompositeProduct::new("KIT-00", "Placeholder");
        let report = evaluate_kit(&empty, &InventorySnapshot::new(), &InventorySnapshot::new());

        assert_eq!(report.availability.producible, Producibility::NoRecipe);
        assert_eq!(report.cost.total_cost, 0.0);
        assert_eq!(report.warnings, vec![EngineWarning::NoRecipe]);
    }
}
