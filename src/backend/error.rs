use std::time::Duration;

use thiserror::Error;

/// Failure of a backend call.
///
/// `Remote` carries the backend's own message verbatim so it can be shown
/// to the user unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0}")]
    Remote(String),

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Unexpected response for {command}: {message}")]
    Decode { command: String, message: String },

    #[error("{command} timed out after {after:?}")]
    Timeout { command: String, after: Duration },
}

impl BackendError {
    pub fn remote(message: impl Into<String>) -> Self {
        BackendError::Remote(message.into())
    }

    pub fn decode(command: &str, err: serde_json::Error) -> Self {
        BackendError::Decode {
            command: command.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}
