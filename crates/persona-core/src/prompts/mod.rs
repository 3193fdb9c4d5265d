//! Prompt templates for persona sample generation.

pub mod persona;

pub use persona::{
    persona_system_context, DEFAULT_PERSONA, DEFAULT_SAMPLE_PROMPT, PERSONA_SYSTEM_TEMPLATE,
};
