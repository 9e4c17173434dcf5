//! Errors reported by the reducer
//!
//! Every variant is recoverable and leaves the state untouched.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The referenced item does not exist in the current list
    #[error("Item #{0} not found")]
    NotFound(u64),

    /// The action name is not one the tracker understands
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl TodoError {
    /// Shorthand for a missing required field
    pub fn missing(field: &str, action: &str) -> Self {
        TodoError::Validation(format!("{} required for {}", field, action))
    }
}
