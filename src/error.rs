//! Error types raised by guarded functions

use thiserror::Error;

use crate::model::{TypeSpec, TypeTag};

/// Result type for guard construction and guarded calls
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors produced while building or invoking a guarded function
#[derive(Error, Debug)]
pub enum GuardError {
    /// The value handed to a guard factory is neither a function nor an async function
    #[error("Argument fn is required and must be a function, got {actual}.")]
    NotCallable {
        /// Classification of the rejected value
        actual: TypeTag,
    },

    /// A strict guard received an argument with no declared specification
    #[error("Argument at position {position} is out of bounds and cannot be type-checked.")]
    ArgumentOutOfBounds {
        /// Zero-based argument position
        position: usize,
    },

    /// An argument did not satisfy its type specification
    #[error("Argument at position {position} is not of type {expected}.")]
    ArgumentTypeMismatch {
        /// Zero-based argument position
        position: usize,
        /// Specification the argument was checked against
        expected: TypeSpec,
        /// Classification of the offending argument
        actual: TypeTag,
    },

    /// The wrapped function itself failed after all checks passed
    #[error(transparent)]
    Call(#[from] anyhow::Error),
}

impl GuardError {
    /// Position of the offending argument, if the error came from an argument check
    pub fn position(&self) -> Option<usize> {
        match self {
            GuardError::ArgumentOutOfBounds { position }
            | GuardError::ArgumentTypeMismatch { position, .. } => Some(*position),
            GuardError::NotCallable { .. } | GuardError::Call(_) => None,
        }
    }

    /// Whether the error was raised by a check rather than by the wrapped function
    pub fn is_check_failure(&self) -> bool {
        !matches!(self, GuardError::Call(_))
    }
}
