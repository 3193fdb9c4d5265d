//! Error types for persona sample generation

use persona_core::PersonaError;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that can occur while calling the text generation service
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Generation service returned no choices")]
    EmptyResponse,

    #[error(transparent)]
    Core(#[from] PersonaError),
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        GenerateError::Request(err.to_string())
    }
}
