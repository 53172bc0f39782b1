//! # Registry State
//!
//! Shared handle to the composition registry.

use std::sync::{Arc, Mutex, PoisonError};

use procura_core::CompositionRegistry;

/// Shared composition registry.
///
/// A poisoned lock is recovered, not propagated. Registry edits validate
/// before they write.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    registry: Arc<Mutex<CompositionRegistry>>,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: CompositionRegistry) -> Self {
        RegistryState {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    /// Executes a function with read access to the registry.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = registry_state.with_registry(|r| r.len());
    /// ```
    pub fn with_registry<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CompositionRegistry) -> R,
    {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        f(&registry)
    }

    /// Executes a function with write access to the registry.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// registry_state.with_registry_mut(|r| r.remove("KIT-01"))?;
    /// ```
    pub fn with_registry_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CompositionRegistry) -> R,
    {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut registry)
    }
}
