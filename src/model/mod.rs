//! Data model: dynamic values, callables and type tags

#![warn(missing_docs)]

pub mod function;
pub mod types;
pub mod value;

pub use function::{AsyncFunction, Callable, Function};
pub use types::{CustomType, PrimitiveType, TypeSpec, TypeTag, UnknownPrimitiveType};
pub use value::{Deferred, Generator, SharedError, Symbol, Value};
