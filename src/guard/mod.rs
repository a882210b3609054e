//! Guard factories wrapping functions with argument type checks

#![warn(missing_docs)]

pub mod constraint;
pub mod guarded;

pub use constraint::{constrain_types, loose_types};
pub use guarded::{GuardMode, GuardedFunction, strong_function, weak_function};
