//! Custom type registry
//!
//! Custom types refine a built-in classification with a semantic predicate, e.g. an
//! `object` with a string `duck` property classified as `duckType`. Predicates are grouped
//! by the built-in type they refine and are consulted in registration order.

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::config::RegistryConfig;
use crate::model::{CustomType, PrimitiveType, Value};

/// Predicate deciding whether a value belongs to a custom type
///
/// A check matches when it returns the tag it was registered under.
pub trait CustomClassifier: Send + Sync {
    /// Classify `value`, returning a custom tag or `None`
    fn classify(&self, value: &Value) -> Option<CustomType>;
}

impl<F> CustomClassifier for F
where
    F: Fn(&Value) -> Option<CustomType> + Send + Sync,
{
    fn classify(&self, value: &Value) -> Option<CustomType> {
        self(value)
    }
}

/// Shared handle to a registered predicate
pub type CustomTypeCheck = Arc<dyn CustomClassifier>;

/// Custom tags of one built-in type paired with their predicates, in registration order
pub type CustomTypeMap = IndexMap<CustomType, CustomTypeCheck>;

/// Wrap a closure as a [`CustomTypeCheck`]
pub fn type_check<F>(check: F) -> CustomTypeCheck
where
    F: Fn(&Value) -> Option<CustomType> + Send + Sync + 'static,
{
    Arc::new(check)
}

static GLOBAL_REGISTRY: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::new()));

/// The process-wide default registry
pub fn global_registry() -> Arc<TypeRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

struct RegistryState {
    checks: FxHashMap<CustomType, CustomTypeCheck>,
    roots: FxHashMap<PrimitiveType, IndexSet<CustomType>>,
    enabled: bool,
}

/// Registry of custom type predicates keyed by the built-in type they refine
///
/// Entries are never removed. Registration from several threads is not ordered;
/// finish registering before guarded calls begin.
pub struct TypeRegistry {
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TypeRegistry")
            .field("custom_type_count", &state.checks.len())
            .field("root_count", &state.roots.len())
            .field("enabled", &state.enabled)
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                checks: FxHashMap::default(),
                roots: FxHashMap::default(),
                enabled: config.enable_custom_types,
            }),
        }
    }

    /// Get the custom types flag, or set it when `enable` is given
    ///
    /// Returns the state after the call.
    pub fn enable_custom_types(&self, enable: Option<bool>) -> bool {
        match enable {
            None => self.state.read().enabled,
            Some(enable) => {
                let mut state = self.state.write();
                if state.enabled != enable {
                    log::debug!("custom types {}", if enable { "enabled" } else { "disabled" });
                }
                state.enabled = enable;
                enable
            }
        }
    }

    /// Current state of the custom types flag
    pub fn custom_types_enabled(&self) -> bool {
        self.enable_custom_types(None)
    }

    /// Register a closure predicate for `custom_type` under `root_type`
    ///
    /// Enables custom types.
    pub fn add_custom_type<F>(
        &self,
        root_type: PrimitiveType,
        custom_type: impl Into<CustomType>,
        check: F,
    ) where
        F: Fn(&Value) -> Option<CustomType> + Send + Sync + 'static,
    {
        self.add_custom_classifier(root_type, custom_type, Arc::new(check));
    }

    /// Register a predicate for `custom_type` under `root_type`
    ///
    /// Registering a tag again replaces its predicate but keeps its original
    /// position under the root. Enables custom types.
    pub fn add_custom_classifier(
        &self,
        root_type: PrimitiveType,
        custom_type: impl Into<CustomType>,
        check: CustomTypeCheck,
    ) {
        let custom_type = custom_type.into();
        let mut state = self.state.write();

        state.enabled = true;
        state.checks.insert(custom_type.clone(), check);
        let is_new = state
            .roots
            .entry(root_type)
            .or_default()
            .insert(custom_type.clone());

        if is_new {
            log::debug!("registered custom type '{custom_type}' under '{root_type}'");
        } else {
            log::debug!("replaced check for custom type '{custom_type}' under '{root_type}'");
        }
    }

    /// Register several custom types under `root_type`, in iteration order
    ///
    /// Accepts a list of pairs as well as a [`CustomTypeMap`] returned by
    /// [`get_custom_types`](Self::get_custom_types).
    pub fn set_custom_types<I, K>(&self, root_type: PrimitiveType, entries: I)
    where
        I: IntoIterator<Item = (K, CustomTypeCheck)>,
        K: Into<CustomType>,
    {
        for (custom_type, check) in entries {
            self.add_custom_classifier(root_type, custom_type, check);
        }
    }

    /// Custom types registered under `root_type`, in registration order
    ///
    /// The returned map is a copy; changing it does not affect the registry.
    pub fn get_custom_types(&self, root_type: PrimitiveType) -> CustomTypeMap {
        let state = self.state.read();
        let Some(custom_types) = state.roots.get(&root_type) else {
            return CustomTypeMap::new();
        };

        custom_types
            .iter()
            .filter_map(|custom_type| {
                state
                    .checks
                    .get(custom_type)
                    .map(|check| (custom_type.clone(), Arc::clone(check)))
            })
            .collect()
    }

    /// Check if any custom type has been registered under `root_type`
    pub fn has_custom_types(&self, root_type: PrimitiveType) -> bool {
        self.state
            .read()
            .roots
            .get(&root_type)
            .is_some_and(|custom_types| !custom_types.is_empty())
    }
}
