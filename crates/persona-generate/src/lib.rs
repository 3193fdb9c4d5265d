//! # Persona Generate: sample replies from a persona-tuned model
//!
//! ```text
//! persona context + prompt + sampling ──▶ TextGenerator ──▶ reply
//!                                             │
//!                        ┌────────────────────┴───────────────────┐
//!                 PlaceholderGenerator              OpenAiCompatibleGenerator
//!                  (no model needed)            (base model + adapter on a server)
//! ```

pub mod error;
pub mod generator;
pub mod openai;

pub use error::{GenerateError, GenerateResult};
pub use generator::{create_generator, generate, generate_sample, PlaceholderGenerator, TextGenerator};
pub use openai::OpenAiCompatibleGenerator;
pub use persona_core::SamplingConfig;
