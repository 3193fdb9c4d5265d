//! OpenAI-compatible chat completion backend.
//!
//! Targets any server exposing `POST {base}/chat/completions` with the base model loaded
//! and the fine-tuning adapter registered under its own model name (vLLM, llama.cpp
//! server, etc.). The adapter name is requested when configured, else the base model.

use crate::error::{GenerateError, GenerateResult};
use crate::generator::TextGenerator;
use persona_core::{GenerationConfig, SamplingConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// OpenAI-compatible request/response
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Not part of the OpenAI schema; accepted by vLLM and llama.cpp.
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Build the request body. Greedy decoding pins temperature to 0 and omits top-k/top-p.
pub(crate) fn build_request(
    model: &str,
    system_context: &str,
    user_prompt: &str,
    sampling: &SamplingConfig,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if !system_context.trim().is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system_context.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: user_prompt.to_string(),
    });

    let (temperature, top_p, top_k) = if sampling.do_sample {
        (sampling.temperature, sampling.top_p, sampling.top_k)
    } else {
        (Some(0.0), None, None)
    };

    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens: sampling.max_tokens,
        temperature,
        top_p,
        top_k,
    }
}

/// First choice's content, trimmed.
pub(crate) fn reply_text(response: ChatResponse) -> GenerateResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .ok_or(GenerateError::EmptyResponse)
}

/// Blocking client for an OpenAI-compatible inference server.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    /// Base URL without trailing slash (e.g. http://127.0.0.1:8000/v1).
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatibleGenerator {
    /// Create with explicit settings.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> GenerateResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GenerateError::Config(
                "generation.endpoint must not be empty".to_string(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url,
            model: model.into(),
            api_key,
            client,
        })
    }

    /// Build from config: endpoint, adapter/base model, timeout; API key from the environment.
    pub fn from_config(config: &GenerationConfig) -> GenerateResult<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            GenerateError::Config(
                "generation.endpoint (PERSONA_GENERATION__ENDPOINT) is required for the http backend"
                    .to_string(),
            )
        })?;
        Self::new(
            endpoint,
            config.model_name(),
            config.api_key(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for OpenAiCompatibleGenerator {
    fn generate(
        &self,
        system_context: &str,
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> GenerateResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_request(&self.model, system_context, user_prompt, sampling);
        debug!(url = %url, model = %self.model, max_tokens = body.max_tokens, "requesting completion");

        let mut req = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        let res = req.send()?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        let parsed: ChatResponse = res.json()?;
        reply_text(parsed)
    }
}
