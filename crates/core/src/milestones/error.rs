//! Error taxonomy for milestone generation.

use thiserror::Error;

/// Failure modes of a single generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON array of milestones, got {0}")]
    NotAnArray(&'static str),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::InvalidJson(err.to_string())
    }
}
