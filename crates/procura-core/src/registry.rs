//! # Composition Registry
//!
//! Validated storage of kit recipes, keyed by composite SKU.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Registry Edit Operations                             │
//! │                                                                         │
//! │  Edit                    Checks                        Effect           │
//! │  ────                    ──────                        ──────           │
//! │  register(kit)           sku, name, links, unique sku  insert           │
//! │  add_component(k, link)  link, duplicate, self, nest   links.push       │
//! │  update_component(k, c)  quantity_per_kit > 0          links[i].qty = q │
//! │  remove_component(k, c)  component exists              links.remove(i)  │
//! │  remove(k)               composite exists              delete           │
//! │                                                                         │
//! │  NESTING: a registered composite is never a component of another one,  │
//! │  and a SKU used as a component cannot be registered as a composite.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshot values (`available_stock`, `unit_cost`) are stripped on write;
//! the registry only ever holds the recipe.
//!
//! Serialized form is a JSON array of composites. Deserializing registers
//! each one through [`CompositionRegistry::from_composites`], so a stored
//! registry passes the same checks as an edit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{ComponentLink, CompositeProduct};
use crate::validation::{
    validate_component_link, validate_component_links, validate_product_name,
    validate_quantity_per_kit, validate_sku,
};
use crate::MAX_COMPONENTS_PER_KIT;

/// All composite products known to the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompositeProduct>", into = "Vec<CompositeProduct>")]
pub struct CompositionRegistry {
    composites: BTreeMap<String, CompositeProduct>,
}

impl TryFrom<Vec<CompositeProduct>> for CompositionRegistry {
    type Error = CoreError;

    fn try_from(composites: Vec<CompositeProduct>) -> CoreResult<Self> {
        Self::from_composites(composites)
    }
}

impl From<CompositionRegistry> for Vec<CompositeProduct> {
    fn from(registry: CompositionRegistry) -> Self {
        registry.composites.into_values().collect()
    }
}

impl CompositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by registering each composite in turn.
    pub fn from_composites<I>(composites: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = CompositeProduct>,
    {
        let mut registry = Self::new();
        for composite in composites {
            registry.register(composite)?;
        }
        Ok(registry)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get(&self, sku: &str) -> Option<&CompositeProduct> {
        self.composites.get(sku.trim())
    }

    /// Like [`get`](Self::get), but a miss is an error.
    pub fn require(&self, sku: &str) -> CoreResult<&CompositeProduct> {
        self.get(sku)
            .ok_or_else(|| CoreError::CompositeNotFound(sku.to_string()))
    }

    /// Composites ordered by SKU.
    pub fn list(&self) -> Vec<&CompositeProduct> {
        self.composites.values().collect()
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.composites.contains_key(sku.trim())
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    /// SKUs of composites whose recipe lists `component_sku`.
    pub fn used_by(&self, component_sku: &str) -> Vec<&str> {
        let component_sku = component_sku.trim();
        self.composites
            .values()
            .filter(|c| c.uses_component(component_sku))
            .map(|c| c.sku.as_str())
            .collect()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Registers a new composite.
    ///
    /// ## Errors
    /// - Invalid SKU, name or recipe
    /// - A composite with the same SKU already exists
    /// - The recipe lists a registered composite, or this SKU is already a
    ///   component of another composite
    pub fn register(&mut self, composite: CompositeProduct) -> CoreResult<&CompositeProduct> {
        let mut composite = normalize(composite);

        validate_sku(&composite.sku)?;
        validate_product_name(&composite.name)?;
        validate_component_links(&composite.sku, &composite.components)?;

        if self.composites.contains_key(&composite.sku) {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: composite.sku,
            }
            .into());
        }
        if let Some(parent) = self.used_by(&composite.sku).first() {
            return Err(ValidationError::NestedComposite {
                composite: (*parent).to_string(),
                component: composite.sku,
            }
            .into());
        }
        for link in &composite.components {
            self.ensure_not_composite(&composite.sku, &link.component_sku)?;
        }

        composite.touch();
        debug!(
            sku = %composite.sku,
            components = composite.components.len(),
            "Registered composite"
        );

        let sku = composite.sku.clone();
        Ok(&*self.composites.entry(sku).or_insert(composite))
    }

    /// Appends a component link to an existing composite's recipe.
    pub fn add_component(
        &mut self,
        composite_sku: &str,
        link: ComponentLink,
    ) -> CoreResult<&CompositeProduct> {
        let link = normalize_link(link);
        validate_component_link(&link)?;
        self.ensure_not_composite(composite_sku, &link.component_sku)?;

        let composite = self.require_mut(composite_sku)?;
        if composite.components.len() >= MAX_COMPONENTS_PER_KIT {
            return Err(ValidationError::TooMany {
                field: "components".to_string(),
                max: MAX_COMPONENTS_PER_KIT,
            }
            .into());
        }
        if link.component_sku == composite.sku {
            return Err(ValidationError::SelfReference {
                sku: composite.sku.clone(),
            }
            .into());
        }
        if composite.uses_component(&link.component_sku) {
            return Err(ValidationError::Duplicate {
                field: "component_sku".to_string(),
                value: link.component_sku,
            }
            .into());
        }

        debug!(
            composite = %composite.sku,
            component = %link.component_sku,
            quantity_per_kit = link.quantity_per_kit,
            "Added component"
        );
        composite.components.push(link);
        composite.touch();
        Ok(&*composite)
    }

    /// Changes how much of a component one kit needs.
    pub fn update_component(
        &mut self,
        composite_sku: &str,
        component_sku: &str,
        quantity_per_kit: f64,
    ) -> CoreResult<&CompositeProduct> {
        validate_quantity_per_kit(quantity_per_kit)?;

        let composite = self.require_mut(composite_sku)?;
        let link = composite
            .components
            .iter_mut()
            .find(|c| c.component_sku == component_sku.trim())
            .ok_or_else(|| CoreError::ComponentNotFound {
                composite: composite_sku.to_string(),
                component: component_sku.to_string(),
            })?;

        debug!(
            composite = %composite_sku,
            component = %component_sku,
            from = link.quantity_per_kit,
            to = quantity_per_kit,
            "Updated component quantity"
        );
        link.quantity_per_kit = quantity_per_kit;
        composite.touch();
        Ok(&*composite)
    }

    /// Removes a component link. Removing the last one leaves an empty
    /// recipe, which is valid.
    pub fn remove_component(
        &mut self,
        composite_sku: &str,
        component_sku: &str,
    ) -> CoreResult<ComponentLink> {
        let composite = self.require_mut(composite_sku)?;
        let index = composite
            .components
            .iter()
            .position(|c| c.component_sku == component_sku.trim())
            .ok_or_else(|| CoreError::ComponentNotFound {
                composite: composite_sku.to_string(),
                component: component_sku.to_string(),
            })?;

        let removed = composite.components.remove(index);
        composite.touch();
        debug!(composite = %composite_sku, component = %component_sku, "Removed component");
        Ok(removed)
    }

    /// Deletes a composite and its recipe.
    pub fn remove(&mut self, sku: &str) -> CoreResult<CompositeProduct> {
        let removed = self
            .composites
            .remove(sku.trim())
            .ok_or_else(|| CoreError::CompositeNotFound(sku.to_string()))?;
        debug!(sku = %removed.sku, "Removed composite");
        Ok(removed)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_mut(&mut self, sku: &str) -> CoreResult<&mut CompositeProduct> {
        self.composites
            .get_mut(sku.trim())
            .ok_or_else(|| CoreError::CompositeNotFound(sku.to_string()))
    }

    fn ensure_not_composite(&self, composite_sku: &str, component_sku: &str) -> CoreResult<()> {
        let component_sku = component_sku.trim();
        if component_sku != composite_sku.trim() && self.contains(component_sku) {
            return Err(ValidationError::NestedComposite {
                composite: composite_sku.trim().to_string(),
                component: component_sku.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn normalize(mut composite: CompositeProduct) -> CompositeProduct {
    composite.sku = composite.sku.trim().to_string();
    composite.name = composite.name.trim().to_string();
    composite.components = composite
        .components
        .into_iter()
        .map(normalize_link)
        .collect();
    composite
}

fn normalize_link(mut link: ComponentLink) -> ComponentLink {
    link.component_sku = link.component_sku.trim().to_string();
    link.without_snapshot()
}

// =============================================================================
// Unit Tests
// =============================================================================
