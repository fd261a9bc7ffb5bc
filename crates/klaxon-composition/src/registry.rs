//! Variant registry
//!
//! Maps variant type names to descriptors. Entries are inserted when a variant
//! is composed at startup and read during dispatch. Names keep their first
//! insertion position; registering a name again overwrites its descriptor in
//! place. A frozen registry rejects writes until it is cleared.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Process-wide registry shared by every dispatcher that does not bring its own
static GLOBAL_REGISTRY: Lazy<Arc<VariantRegistry>> = Lazy::new(|| Arc::new(VariantRegistry::new()));

/// Handle to the process-wide registry
pub fn global() -> Arc<VariantRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// Description of a composed variant type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDescriptor {
    /// Registry key
    pub type_name: String,
    /// Fields checked after construction
    pub required_fields: Vec<String>,
    /// Qualified name of the wrapped operation
    pub operation: String,
    /// Human-readable summary
    pub description: String,
}

impl VariantDescriptor {
    /// Create a descriptor with no required fields
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            operation: format!("{type_name}.evacuate"),
            type_name,
            required_fields: Vec::new(),
            description: String::new(),
        }
    }

    /// Declare the fields validated after construction
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the wrapped operation name
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No variant registered under this name
    #[error("Variant '{name}' not registered")]
    NotRegistered {
        /// Name that was looked up
        name: String,
    },

    /// Registry was frozen after startup
    #[error("Registry is frozen; cannot register '{name}'")]
    Frozen {
        /// Name that was being registered
        name: String,
    },
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: IndexMap<String, VariantDescriptor>,
    frozen: bool,
}

/// Insertion-ordered map from type name to [`VariantDescriptor`]
#[derive(Default)]
pub struct VariantRegistry {
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("VariantRegistry")
            .field("entries", &state.entries.keys().collect::<Vec<_>>())
            .field("frozen", &state.frozen)
            .finish()
    }
}

impl VariantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a descriptor, returning the one it replaced
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Frozen`] once [`freeze`](Self::freeze) was called.
    pub fn register(
        &self,
        name: impl Into<String>,
        descriptor: VariantDescriptor,
    ) -> Result<Option<VariantDescriptor>, RegistryError> {
        let name = name.into();
        let mut state = self.state.write();
        if state.frozen {
            return Err(RegistryError::Frozen { name });
        }
        let previous = state.entries.insert(name.clone(), descriptor);
        if previous.is_some() {
            debug!(variant = %name, "Overwrote registry entry");
        } else {
            info!(variant = %name, "[Registry] {name} added to registry");
        }
        Ok(previous)
    }

    /// Descriptor registered under `name`
    pub fn lookup(&self, name: &str) -> Result<VariantDescriptor, RegistryError> {
        self.state
            .read()
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.state.read().entries.contains_key(name)
    }

    /// Registered names in insertion order
    pub fn list(&self) -> Vec<String> {
        self.state.read().entries.keys().cloned().collect()
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Reject further registrations
    pub fn freeze(&self) {
        self.state.write().frozen = true;
        debug!("Registry frozen");
    }

    /// Whether the registry is read-only
    pub fn is_frozen(&self) -> bool {
        self.state.read().frozen
    }

    /// Remove every entry and unfreeze; intended for test isolation
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.frozen = false;
        info!("[Registry] Registry cleared");
    }
}
