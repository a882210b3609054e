//! Registry configuration

use serde::{Deserialize, Serialize};

/// Settings applied when a [`TypeRegistry`](super::TypeRegistry) is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Initial state of the custom types flag; registering a custom type turns it on
    pub enable_custom_types: bool,
}
