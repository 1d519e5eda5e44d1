use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced to callers of session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Input rejected before any backend call was made
    #[error("{0}")]
    Validation(String),

    #[error("No workspace selected")]
    NoWorkspaceSelected,

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The coordinator stopped before the operation resolved
    #[error("Session closed before the operation completed")]
    Closed,
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::Validation(message.into())
    }
}
