//! Runtime argument type checking for dynamically typed values
//!
//! Values are classified into one of thirteen built-in types, optionally refined by
//! custom types registered in a [`TypeRegistry`]. Guard factories wrap a function so
//! that its arguments are checked before it runs:
//!
//! ```
//! use strong_typeof::{Callable, Value, strong_function};
//!
//! let confirm = strong_function(
//!     ["string", "number"],
//!     Callable::from_fn("confirm", |args| {
//!         let text = args[0].as_str().unwrap_or_default();
//!         let num = args.get(1).and_then(Value::as_f64).unwrap_or(1.0);
//!         Ok(Value::from(format!("{text}{num}")))
//!     }),
//! )
//! .unwrap();
//!
//! assert_eq!(confirm.call(&["x".into(), 1.into()]).unwrap(), Value::from("x1"));
//! assert!(confirm.call(&[12.into()]).is_err());
//! ```
//!
//! The free functions in this module operate on the process-wide default registry.
//! Pass an explicit `Arc<TypeRegistry>` to keep registrations isolated.

pub mod error;
pub mod guard;
pub mod model;
pub mod registry;

pub use error::{GuardError, Result};
pub use guard::{GuardMode, GuardedFunction, strong_function, weak_function};
pub use model::{
    AsyncFunction, Callable, CustomType, Deferred, Function, Generator, PrimitiveType, Symbol,
    TypeSpec, TypeTag, Value,
};
pub use registry::{
    CustomClassifier, CustomTypeCheck, CustomTypeMap, RegistryConfig, TypeRegistry,
    global_registry, type_check,
};

/// The thirteen built-in types
pub fn builtin_types() -> Vec<PrimitiveType> {
    PrimitiveType::ALL.to_vec()
}

/// Classify a value using the default registry
pub fn type_of(value: &Value) -> TypeTag {
    global_registry().type_of(value)
}

/// Check a value against one or more types using the default registry
pub fn is_type<I, T>(value: &Value, types: I) -> bool
where
    I: IntoIterator<Item = T>,
    T: Into<TypeTag>,
{
    global_registry().is_type(value, types)
}

/// Get or set the custom types flag of the default registry
pub fn enable_custom_types(enable: Option<bool>) -> bool {
    global_registry().enable_custom_types(enable)
}

/// Register a custom type in the default registry
pub fn add_custom_type<F>(root_type: PrimitiveType, custom_type: impl Into<CustomType>, check: F)
where
    F: Fn(&Value) -> Option<CustomType> + Send + Sync + 'static,
{
    global_registry().add_custom_type(root_type, custom_type, check);
}

/// Register several custom types in the default registry
pub fn set_custom_types<I, K>(root_type: PrimitiveType, entries: I)
where
    I: IntoIterator<Item = (K, CustomTypeCheck)>,
    K: Into<CustomType>,
{
    global_registry().set_custom_types(root_type, entries);
}

/// Custom types registered under `root_type` in the default registry
pub fn get_custom_types(root_type: PrimitiveType) -> CustomTypeMap {
    global_registry().get_custom_types(root_type)
}
