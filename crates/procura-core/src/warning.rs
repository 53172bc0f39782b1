//! # Engine Warnings
//!
//! Degraded input is accepted and produces a best-effort result plus one of
//! these warnings. Warnings are informational: they never block computation
//! or display, and they are returned next to results rather than raised.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input problem                     Engine behaviour         Warning     │
//! │  ───────────────────────────────   ──────────────────────   ─────────── │
//! │  Recipe has no components          producible = NoRecipe   NoRecipe    │
//! │  Stock unknown for a component     stock treated as 0      MissingStock│
//! │  Cost unknown for a component      cost treated as 0       MissingCost │
//! │  Line item missing a dimension     volume assumed 0        Dimensions… │
//! │  Line item missing unit weight     weight assumed 0        WeightMiss… │
//! │  Weight alone needs more boxes     volume count is kept    WeightExc…  │
//! │  Count above MAX_CONTAINERS        no containers laid out  TooMany…    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A non-fatal notice about degraded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineWarning {
    /// The composite has no component links yet, so it is not a real kit.
    NoRecipe,

    /// No stock level was supplied for a component.
    MissingStock { sku: String },

    /// No unit cost was supplied for a component.
    MissingCost { sku: String },

    /// A line item is missing one or more carton dimensions.
    DimensionsMissing { line_id: String },

    /// A line item is missing its unit weight.
    WeightMissing { line_id: String },

    /// Total weight alone would need more containers than volume does.
    /// The allocation still follows volume.
    WeightExceedsCapacity {
        containers_by_weight: u64,
        containers_by_volume: u64,
    },

    /// The consignment needs more containers than the allocator lays out.
    TooManyContainers { containers_needed: u64, max: u64 },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::NoRecipe => write!(f, "no recipe defined"),
            EngineWarning::MissingStock { sku } => {
                write!(f, "stock unknown for {sku} — assumed 0")
            }
            EngineWarning::MissingCost { sku } => {
                write!(f, "unit cost unknown for {sku} — assumed 0")
            }
            EngineWarning::DimensionsMissing { line_id } => {
                write!(f, "line {line_id}: dimensions missing — volume assumed 0")
            }
            EngineWarning::WeightMissing { line_id } => {
                write!(f, "line {line_id}: weight missing — affects freight estimate")
            }
            EngineWarning::WeightExceedsCapacity {
                containers_by_weight,
                containers_by_volume,
            } => write!(
                f,
                "cargo weight needs {containers_by_weight} containers but volume allocation uses {containers_by_volume}"
            ),
            EngineWarning::TooManyContainers {
                containers_needed,
                max,
            } => write!(
                f,
                "{containers_needed} containers needed; allocation is limited to {max}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        assert_eq!(EngineWarning::NoRecipe.to_string(), "no recipe defined");
        let warning = EngineWarning::DimensionsMissing {
            line_id: "L1".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "line L1: dimensions missing — volume assumed 0"
        );
    }

    #[test]
    fn test_warning_serialization_is_tagged() {
        let json = serde_json::to_string(&EngineWarning::MissingStock {
            sku: "BOLT".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"missing_stock","sku":"BOLT"}"#);

        let json = serde_json::to_string(&EngineWarning::NoRecipe).unwrap();
        assert_eq!(json, r#"{"kind":"no_recipe"}"#);
    }
}
