//! Custom type registry and value classification
//!
//! A [`TypeRegistry`] holds the custom type checks consulted when classifying values.
//! Core operations take an explicit registry; [`global_registry`] offers a shared default.

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod custom_types;

pub use config::RegistryConfig;
pub use custom_types::{
    CustomClassifier, CustomTypeCheck, CustomTypeMap, TypeRegistry, global_registry, type_check,
};
