//! Error type for intake backend requests.

use thiserror::Error;

/// Failure of a single request against the intake backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `detail` is the
    /// server-provided explanation when the error body carried one.
    #[error("API request failed: {message}")]
    Status {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// The request never produced a usable response (connect failure,
    /// timeout, body decode failure).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status code, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    /// Single displayable string for the end user. The server's detail
    /// message is preferred over the generic status message when available.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(err) => err.to_string(),
        }
    }
}
