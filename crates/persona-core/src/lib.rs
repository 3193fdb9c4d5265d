//! persona-core: shared types, configuration, and prompts for the persona tools.
//!
//! `persona-dataset` and `persona-generate` both depend on this crate so the
//! dialogue/dataset types and the layered config stay in one place.

mod config;
mod error;
mod shared;
pub mod prompts;

pub use crate::config::{
    DatasetConfig, GenerationBackend, GenerationConfig, PersonaConfig, SamplingConfig,
    DEFAULT_CONFIG_STEM, DEFAULT_TARGET_SPEAKER, ENV_PREFIX,
};
pub use crate::error::{PersonaError, PersonaResult};
pub use crate::shared::{DatasetRecord, QaPair, Utterance};
