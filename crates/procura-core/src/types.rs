//! # Domain Types
//!
//! Core domain types shared by the calculators.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌──────────────────────────┐           │
//! │  │  CompositeProduct   │ 1    * │     ComponentLink        │           │
//! │  │  ─────────────────  │───────►│  ──────────────────────  │           │
//! │  │  id (UUID)          │        │  component_sku           │           │
//! │  │  sku (business)     │        │  quantity_per_kit (> 0)  │           │
//! │  │  name               │        │  available_stock  ┐      │           │
//! │  │  components         │        │  unit_cost        ┘ snap │           │
//! │  └─────────────────────┘        └──────────────────────────┘           │
//! │                                                                         │
//! │  ┌─────────────────────┐                                               │
//! │  │ ContainerTypeProfile│  fixed catalog: 20GP, 40GP, 40HC              │
//! │  │  volume_capacity m³ │                                               │
//! │  │  weight_capacity kg │                                               │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Composites have a UUID `id` (immutable) and a business `sku`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

// =============================================================================
// Component Link
// =============================================================================

/// One row of a kit recipe: a component SKU and how much of it one kit needs.
///
/// `available_stock` and `unit_cost` are transient. They are attached from a
/// snapshot at evaluation time and are never part of the stored recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComponentLink {
    /// SKU of the component product.
    pub component_sku: String,

    /// Denormalized display label.
    pub component_name: String,

    /// Quantity required per kit. Always > 0 once written.
    pub quantity_per_kit: f64,

    /// Optional unit of measure reference (e.g. "pcs", "kg").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,

    /// Stock on hand at evaluation time (None = unknown).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<f64>,

    /// Unit cost at evaluation time (None = unknown).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
}

impl ComponentLink {
    /// Creates a link with no snapshot data attached.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, quantity_per_kit: f64) -> Self {
        ComponentLink {
            component_sku: sku.into(),
            component_name: name.into(),
            quantity_per_kit,
            unit_of_measure: None,
            available_stock: None,
            unit_cost: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }

    pub fn with_stock(mut self, stock: f64) -> Self {
        self.available_stock = Some(stock);
        self
    }

    pub fn with_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    /// Drops any attached snapshot values, leaving only the recipe data.
    pub fn without_snapshot(mut self) -> Self {
        self.available_stock = None;
        self.unit_cost = None;
        self
    }
}

// =============================================================================
// Composite Product
// =============================================================================

/// A sellable kit assembled from component products by a fixed recipe.
///
/// The model is single-level: a composite is never itself a component of
/// another composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompositeProduct {
    /// Unique identifier (UUID v4). Generated when absent from input.
    #[serde(default = "new_id")]
    pub id: String,

    /// Business identifier, unique across the registry.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Recipe rows. No two links share a component SKU.
    #[serde(default)]
    pub components: Vec<ComponentLink>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl CompositeProduct {
    /// Creates a composite with an empty recipe.
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        CompositeProduct {
            id: new_id(),
            sku: sku.into(),
            name: name.into(),
            components: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper used when assembling a recipe in one go.
    pub fn with_component(mut self, link: ComponentLink) -> Self {
        self.components.push(link);
        self
    }

    /// Returns true if the recipe has no components yet.
    pub fn has_recipe(&self) -> bool {
        !self.components.is_empty()
    }

    /// Finds a component link by SKU.
    pub fn component(&self, sku: &str) -> Option<&ComponentLink> {
        self.components.iter().find(|c| c.component_sku == sku)
    }

    /// Returns true if `sku` appears in this recipe.
    pub fn uses_component(&self, sku: &str) -> bool {
        self.component(sku).is_some()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Container Type Profile
// =============================================================================

/// Fixed volume/weight capacity of one shipping container type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContainerTypeProfile {
    /// Catalog code, e.g. "20GP".
    pub code: String,

    /// Display name.
    pub name: String,

    /// Usable volume in cubic meters (> 0).
    pub volume_capacity: f64,

    /// Maximum payload in kilograms (> 0).
    pub weight_capacity: f64,
}

impl ContainerTypeProfile {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        volume_capacity: f64,
        weight_capacity: f64,
    ) -> Self {
        ContainerTypeProfile {
            code: code.into(),
            name: name.into(),
            volume_capacity,
            weight_capacity,
        }
    }

    /// 20' general purpose container.
    pub fn twenty_foot() -> Self {
        Self::new("20GP", "20' Standard", 33.2, 28_200.0)
    }

    /// 40' general purpose container.
    pub fn forty_foot() -> Self {
        Self::new("40GP", "40' Standard", 67.7, 26_700.0)
    }

    /// 40' high cube container.
    pub fn forty_foot_high_cube() -> Self {
        Self::new("40HC", "40' High Cube", 76.2, 26_600.0)
    }

    /// The fixed catalog of standard sizes, smallest first.
    pub fn catalog() -> Vec<ContainerTypeProfile> {
        vec![
            Self::twenty_foot(),
            Self::forty_foot(),
            Self::forty_foot_high_cube(),
        ]
    }

    /// Looks up a catalog profile by code (case-insensitive).
    pub fn by_code(code: &str) -> Result<ContainerTypeProfile, CoreError> {
        let wanted = code.trim();
        Self::catalog()
            .into_iter()
            .find(|p| p.code.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownContainerType(code.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
