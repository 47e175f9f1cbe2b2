//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    /// Raised before any markup is produced when the template name is missing.
    #[error("jbst name cannot be empty")]
    EmptyName,
    #[error("'{0}' is not a valid JavaScript identifier")]
    InvalidIdentifier(String),
    #[error("container element id cannot be empty")]
    EmptyElementId,
    #[error("container element id '{0}' must not contain whitespace")]
    InvalidElementId(String),
    #[error("failed to serialize inline data: {0}")]
    Serialize(#[from] serde_json::Error),
}
