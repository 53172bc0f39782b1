//! # procura-core: Allocation & Availability Engine
//!
//! Pure computations behind the inventory and procurement back-office.
//! Two problems share the same shape here: a resource with fixed capacities,
//! a demand, and the question of feasibility and the limiting constraint.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Procura Data Flow                                │
//! │                                                                         │
//! │  CompositionRegistry ──┬──► availability ──┐                           │
//! │  (kit recipes)         │                   ├──► KitReport ──► caller   │
//! │                        └──► cost ──────────┘                           │
//! │                                                                         │
//! │  Quotation line items ──► quotation (totals) ──► container ──► caller  │
//! │                                                                         │
//! │  Stock / cost / rates ──► lookup traits (snapshots passed in)          │
//! │                                                                         │
//! │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS OVER SNAPSHOTS             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Composite products, component links, container profiles
//! - [`registry`] - Validated storage of kit recipes
//! - [`availability`] - Producible kits, bottleneck, shortfall
//! - [`cost`] - Kit cost rollup
//! - [`kit`] - Availability + cost over a registry entry and a snapshot
//! - [`container`] - Multi-container shipment allocation
//! - [`quotation`] - Line-item pipeline and grand totals
//! - [`currency`] - User-editable conversion factors
//! - [`lookup`] - Stock, cost and rate collaborator traits
//! - [`warning`] - Degraded-input warnings
//! - [`validation`] - Write-time rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use procura_core::availability::compute_availability;
//! use procura_core::types::ComponentLink;
//!
//! let links = vec![
//!     ComponentLink::new("A", "Bolt", 2.0).with_stock(10.0),
//!     ComponentLink::new("B", "Nut", 3.0).with_stock(7.0),
//! ];
//!
//! let availability = compute_availability(&links);
//! assert_eq!(availability.producible.kits(), Some(2));
//! assert_eq!(availability.limiting_sku(), Some("B"));
//! ```

pub mod availability;
pub mod container;
pub mod cost;
pub mod currency;
pub mod error;
pub mod kit;
pub mod lookup;
pub mod quotation;
pub mod registry;
pub mod types;
pub mod validation;
pub mod warning;

mod math;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{compute_availability, compute_shortfall, Availability, Producibility};
pub use container::{allocate, AllocationResult, ContainerFill};
pub use cost::{compute_kit_cost, KitCost};
pub use currency::ConversionFactors;
pub use error::{CoreError, CoreResult, ValidationError};
pub use kit::{evaluate_kit, KitReport};
pub use lookup::{
    attach_snapshot, CostLookup, FallbackRates, InventorySnapshot, RateService, StaticRates,
    StockLookup,
};
pub use quotation::{
    recompute_line, LineField, LineItemInput, LineTotals, Quotation, QuotationLineItem,
    QuotationTotals,
};
pub use registry::CompositionRegistry;
pub use types::{ComponentLink, CompositeProduct, ContainerTypeProfile};
pub use warning::EngineWarning;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Cubic centimeters per cubic meter (carton dimensions are entered in cm).
pub const CM3_PER_M3: f64 = 1_000_000.0;

/// Grams per kilogram (unit weights are entered in grams).
pub const GRAMS_PER_KG: f64 = 1_000.0;

/// Maximum number of component links a single kit recipe may hold.
pub const MAX_COMPONENTS_PER_KIT: usize = 200;

/// Largest container count [`allocate`] will lay out. A consignment needing
/// more returns no containers and a `TooManyContainers` warning.
pub const MAX_CONTAINERS: u64 = 10_000;
