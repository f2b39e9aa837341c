use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error} ({status}): {message}")]
pub struct ApiError {
    pub error: String,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            message: message.into(),
        }
    }
}
