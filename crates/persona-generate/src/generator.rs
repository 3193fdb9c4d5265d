//! **Text generation**: one reply from a persona-tuned model.
//!
//! Callers see a single capability, [`TextGenerator::generate`]. Model loading, the
//! adapter, chat templating and decoding all live behind it, in whatever service the
//! backend talks to.

use crate::error::{GenerateError, GenerateResult};
use crate::openai::OpenAiCompatibleGenerator;
use persona_core::{GenerationBackend, GenerationConfig, SamplingConfig};
use tracing::info;

/// Backend that turns (persona context, prompt) into a reply.
pub trait TextGenerator: Send + Sync {
    /// Generate one reply. Returns only the new text (the prompt is not echoed).
    fn generate(
        &self,
        system_context: &str,
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> GenerateResult<String>;
}

/// Placeholder generator: returns a fixed string. Use for wiring and tests without a model.
#[derive(Debug, Default)]
pub struct PlaceholderGenerator {
    /// If set, return this instead of the default message.
    pub response: Option<String>,
}

impl PlaceholderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(s: impl Into<String>) -> Self {
        Self {
            response: Some(s.into()),
        }
    }
}

impl TextGenerator for PlaceholderGenerator {
    fn generate(
        &self,
        system_context: &str,
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> GenerateResult<String> {
        if let Some(ref r) = self.response {
            return Ok(r.clone());
        }
        Ok(format!(
            "[generation placeholder: context {} chars, prompt {} chars, max_tokens {}; set generation.backend = \"http\"]",
            system_context.chars().count(),
            user_prompt.chars().count(),
            sampling.max_tokens
        ))
    }
}

/// Build the configured generator.
pub fn create_generator(config: &GenerationConfig) -> GenerateResult<Box<dyn TextGenerator>> {
    match config.backend {
        GenerationBackend::Placeholder => {
            info!("using placeholder generator");
            Ok(Box::new(PlaceholderGenerator::new()))
        }
        GenerationBackend::Http => {
            let generator = OpenAiCompatibleGenerator::from_config(config)?;
            info!(
                endpoint = %generator.base_url(),
                model = %generator.model(),
                "using OpenAI-compatible generator"
            );
            Ok(Box::new(generator))
        }
    }
}

/// Validate the sampling settings and generate one reply with `generator`.
pub fn generate(
    generator: &dyn TextGenerator,
    system_context: &str,
    user_prompt: &str,
    sampling: &SamplingConfig,
) -> GenerateResult<String> {
    sampling.validate()?;
    if user_prompt.trim().is_empty() {
        return Err(GenerateError::Config("prompt must not be empty".to_string()));
    }
    generator.generate(system_context, user_prompt, sampling)
}

/// Generate the configured sample: configured persona context, prompt, and sampling.
pub fn generate_sample(
    generator: &dyn TextGenerator,
    config: &GenerationConfig,
) -> GenerateResult<String> {
    generate(
        generator,
        &config.system_context,
        &config.prompt,
        &config.sampling,
    )
}
