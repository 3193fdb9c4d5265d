//! Error types for persona configuration and shared plumbing

use thiserror::Error;

/// Result type alias for core operations
pub type PersonaResult<T> = Result<T, PersonaError>;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
