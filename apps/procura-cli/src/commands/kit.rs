//! # Kit Commands
//!
//! Recipe edits on the composition registry, and kit evaluation against a
//! stock/cost snapshot supplied by the caller.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Recipe editor                                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  KIT-01  Starter Kit                       producible: 2         │  │
//! │  ├──────────────────────────────────────────────────────────────────┤  │
//! │  │  A   Bolt M6     need 2    stock 10    cap 5                      │  │
//! │  │  B   Nut M6      need 3    stock 7     cap 2   ◄── limiting       │  │
//! │  ├──────────────────────────────────────────────────────────────────┤  │
//! │  │  Kit cost                                   5.40                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  every edit ──► registry write (validated) ──► evaluate_composite()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use procura_core::availability::{compute_shortfall, ComponentShortfall};
use procura_core::{
    attach_snapshot, evaluate_kit, ComponentLink, CompositeProduct, InventorySnapshot, KitReport,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::RegistryState;

// =============================================================================
// Recipe Edits
// =============================================================================

pub fn register_composite(
    registry: &RegistryState,
    composite: CompositeProduct,
) -> Result<CompositeProduct, ApiError> {
    debug!(sku = %composite.sku, "register_composite command");
    registry.with_registry_mut(|r| Ok::<_, ApiError>(r.register(composite)?.clone()))
}

pub fn add_component(
    registry: &RegistryState,
    composite_sku: &str,
    link: ComponentLink,
) -> Result<CompositeProduct, ApiError> {
    debug!(composite = %composite_sku, component = %link.component_sku, "add_component command");
    registry.with_registry_mut(|r| Ok::<_, ApiError>(r.add_component(composite_sku, link)?.clone()))
}

pub fn update_component(
    registry: &RegistryState,
    composite_sku: &str,
    component_sku: &str,
    quantity_per_kit: f64,
) -> Result<CompositeProduct, ApiError> {
    debug!(
        composite = %composite_sku,
        component = %component_sku,
        quantity_per_kit,
        "update_component command"
    );
    registry.with_registry_mut(|r| {
        let composite = r.update_component(composite_sku, component_sku, quantity_per_kit)?;
        Ok::<_, ApiError>(composite.clone())
    })
}

/// Removes a component and returns the composite as it now stands.
pub fn remove_component(
    registry: &RegistryState,
    composite_sku: &str,
    component_sku: &str,
) -> Result<CompositeProduct, ApiError> {
    debug!(composite = %composite_sku, component = %component_sku, "remove_component command");
    registry.with_registry_mut(|r| {
        r.remove_component(composite_sku, component_sku)?;
        Ok::<_, ApiError>(r.require(composite_sku)?.clone())
    })
}

pub fn remove_composite(registry: &RegistryState, sku: &str) -> Result<CompositeProduct, ApiError> {
    debug!(sku = %sku, "remove_composite command");
    registry.with_registry_mut(|r| Ok::<_, ApiError>(r.remove(sku)?))
}

// =============================================================================
// Reads & Evaluation
// =============================================================================

pub fn get_composite(registry: &RegistryState, sku: &str) -> Result<CompositeProduct, ApiError> {
    registry.with_registry(|r| Ok::<_, ApiError>(r.require(sku)?.clone()))
}

pub fn list_composites(registry: &RegistryState) -> Vec<CompositeProduct> {
    registry.with_registry(|r| r.list().into_iter().cloned().collect())
}

/// Availability and cost of one composite.
pub fn evaluate_composite(
    registry: &RegistryState,
    sku: &str,
    snapshot: &InventorySnapshot,
) -> Result<KitReport, ApiError> {
    debug!(sku = %sku, "evaluate_composite command");
    registry.with_registry(|r| Ok::<_, ApiError>(evaluate_kit(r.require(sku)?, snapshot, snapshot)))
}

/// Availability and cost of every composite, ordered by SKU.
pub fn evaluate_all(registry: &RegistryState, snapshot: &InventorySnapshot) -> Vec<KitReport> {
    registry.with_registry(|r| {
        r.list()
            .into_iter()
            .map(|c| evaluate_kit(c, snapshot, snapshot))
            .collect()
    })
}

/// What is missing to build `target_kits` of one composite.
pub fn composite_shortfall(
    registry: &RegistryState,
    sku: &str,
    snapshot: &InventorySnapshot,
    target_kits: u64,
) -> Result<Vec<ComponentShortfall>, ApiError> {
    debug!(sku = %sku, target_kits, "composite_shortfall command");
    let mut links = registry.with_registry(|r| Ok::<_, ApiError>(r.require(sku)?.components.clone()))?;
    attach_snapshot(&mut links, snapshot, snapshot);
    Ok(compute_shortfall(&links, target_kits))
}
