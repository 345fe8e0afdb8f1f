//! FILENAME: client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Whether the session should be considered dead after this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}
