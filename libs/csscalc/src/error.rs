//! Error types for calc() resolution

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Resolution errors.
///
/// Values that merely cannot be resolved yet (unknown units, missing custom properties)
/// are not errors; they come back as [`crate::Resolved::Unresolved`], `None` or `""`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input of the wrong shape, e.g. a non-dimension token handed to the dimension resolver.
    #[error("Type error: {0}")]
    TypeError(String),

    /// Malformed bracket nesting or an unexpected token while reducing a group.
    #[error("Syntax error: {0}")]
    SyntaxError(String),
}
