//! Persona configuration: dataset paths, target speaker, and generation settings.
//!
//! Precedence (lowest to highest): struct defaults < TOML file < `PERSONA_*` environment.
//! Binaries apply CLI overrides on top of the loaded value.

use crate::error::{PersonaError, PersonaResult};
use crate::prompts::{persona_system_context, DEFAULT_PERSONA, DEFAULT_SAMPLE_PROMPT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file stem, resolved with any extension the `config` crate understands.
pub const DEFAULT_CONFIG_STEM: &str = "config/persona";

/// Environment prefix; nested keys use `__`, e.g. `PERSONA_DATASET__TARGET_SPEAKER`.
pub const ENV_PREFIX: &str = "PERSONA";

/// Speaker whose lines become responses in the bundled dataset.
pub const DEFAULT_TARGET_SPEAKER: &str = "孔明";

/// Top-level configuration for both tools.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | PERSONA_CONFIG | config/persona | Config file path (extension optional). |
/// | PERSONA_DATASET__INPUT_PATH | data/三国演义.jsonl | Line-delimited transcript. |
/// | PERSONA_DATASET__OUTPUT_PATH | data/孔明.json | SFT dataset written by `persona-dataset`. |
/// | PERSONA_DATASET__TARGET_SPEAKER | 孔明 | Speaker whose lines are extracted as responses. |
/// | PERSONA_GENERATION__BACKEND | placeholder | `placeholder` or `http`. |
/// | PERSONA_GENERATION__ENDPOINT | (none) | Base URL of an OpenAI-compatible server. |
/// | PERSONA_LLM_API_KEY / OPENAI_API_KEY | (none) | Bearer key for the HTTP backend. |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub dataset: DatasetConfig,
    pub generation: GenerationConfig,
}

/// Where the transcript comes from, where the dataset goes, and whose lines count as responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_speaker: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/三国演义.jsonl"),
            output_path: PathBuf::from("data/孔明.json"),
            target_speaker: DEFAULT_TARGET_SPEAKER.to_string(),
        }
    }
}

/// Which text generation service to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    /// Canned reply; no model required.
    #[default]
    Placeholder,
    /// OpenAI-compatible `/chat/completions` endpoint.
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    /// Base URL without the `/chat/completions` suffix (e.g. `http://127.0.0.1:8000/v1`).
    pub endpoint: Option<String>,
    /// Pretrained base model served by the endpoint.
    pub base_model: String,
    /// Fine-tuning adapter registered on the endpoint; requested instead of the base model when set.
    pub adapter: Option<String>,
    pub timeout_secs: u64,
    /// Persona context sent ahead of the prompt.
    pub system_context: String,
    pub prompt: String,
    pub sampling: SamplingConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::default(),
            endpoint: None,
            base_model: "Qwen/Qwen2.5-7B-Instruct".to_string(),
            adapter: None,
            timeout_secs: 60,
            system_context: persona_system_context(DEFAULT_PERSONA),
            prompt: DEFAULT_SAMPLE_PROMPT.to_string(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Model name to request: the adapter when configured, else the base model.
    pub fn model_name(&self) -> &str {
        self.adapter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.base_model.as_str())
    }

    /// API key from the environment. Priority: PERSONA_LLM_API_KEY > OPENAI_API_KEY.
    /// Keys are never read from the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("PERSONA_LLM_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Decoding knobs passed through to the generation service.
///
/// `do_sample = false` means greedy decoding; the sampling knobs are then ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub do_sample: bool,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub temperature: Option<f32>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2500,
            do_sample: true,
            top_k: Some(1),
            top_p: None,
            temperature: None,
        }
    }
}

impl SamplingConfig {
    /// Greedy decoding with the given token budget.
    pub fn greedy(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            do_sample: false,
            top_k: None,
            top_p: None,
            temperature: None,
        }
    }

    pub fn validate(&self) -> PersonaResult<()> {
        if self.max_tokens == 0 {
            return Err(PersonaError::InvalidConfig(
                "sampling.max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.top_k == Some(0) {
            return Err(PersonaError::InvalidConfig(
                "sampling.top_k must be at least 1".to_string(),
            ));
        }
        if let Some(p) = self.top_p {
            if !(p > 0.0 && p <= 1.0) {
                return Err(PersonaError::InvalidConfig(format!(
                    "sampling.top_p must be in (0, 1], got {}",
                    p
                )));
            }
        }
        if let Some(t) = self.temperature {
            if !(t >= 0.0 && t.is_finite()) {
                return Err(PersonaError::InvalidConfig(format!(
                    "sampling.temperature must be a non-negative number, got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}

impl PersonaConfig {
    /// Load config from file and environment. File: `PERSONA_CONFIG` or `config/persona` (optional).
    pub fn load() -> PersonaResult<Self> {
        match std::env::var("PERSONA_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::load_from(Some(Path::new(path.trim()))),
            _ => Self::load_from(None),
        }
    }

    /// Load with an explicit config file (required when given) layered under the environment.
    /// With `None`, the default stem is used if present.
    pub fn load_from(path: Option<&Path>) -> PersonaResult<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_STEM).required(false),
        };

        let built = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = built.try_deserialize()?;
        tracing::debug!(
            input = %loaded.dataset.input_path.display(),
            output = %loaded.dataset.output_path.display(),
            speaker = %loaded.dataset.target_speaker,
            backend = ?loaded.generation.backend,
            "persona config loaded"
        );
        Ok(loaded)
    }

    /// Reject values no run could succeed with.
    pub fn validate(&self) -> PersonaResult<()> {
        if self.dataset.target_speaker.trim().is_empty() {
            return Err(PersonaError::InvalidConfig(
                "dataset.target_speaker must not be empty".to_string(),
            ));
        }
        if self.generation.timeout_secs == 0 {
            return Err(PersonaError::InvalidConfig(
                "generation.timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.generation.sampling.validate()
    }

    /// Effective configuration as TOML (for `--dump-config`).
    pub fn to_toml_string(&self) -> PersonaResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the effective configuration to `path`, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> PersonaResult<()> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_bundled_dataset() {
        let cfg = PersonaConfig::default();
        assert_eq!(cfg.dataset.target_speaker, "孔明");
        assert_eq!(cfg.generation.backend, GenerationBackend::Placeholder);
        assert_eq!(cfg.generation.sampling.max_tokens, 2500);
        assert_eq!(cfg.generation.sampling.top_k, Some(1));
        assert!(cfg.generation.sampling.do_sample);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn model_name_prefers_adapter() {
        let mut g = GenerationConfig::default();
        assert_eq!(g.model_name(), "Qwen/Qwen2.5-7B-Instruct");
        g.adapter = Some("  ".to_string());
        assert_eq!(g.model_name(), "Qwen/Qwen2.5-7B-Instruct");
        g.adapter = Some("kongming-lora".to_string());
        assert_eq!(g.model_name(), "kongming-lora");
    }

    #[test]
    fn sampling_validation() {
        assert!(SamplingConfig::default().validate().is_ok());
        assert!(SamplingConfig::greedy(16).validate().is_ok());
        assert!(SamplingConfig::greedy(0).validate().is_err());

        let mut s = SamplingConfig::default();
        s.top_k = Some(0);
        assert!(s.validate().is_err());

        let mut s = SamplingConfig::default();
        s.top_p = Some(1.5);
        assert!(s.validate().is_err());
        s.top_p = Some(0.9);
        assert!(s.validate().is_ok());

        let mut s = SamplingConfig::default();
        s.temperature = Some(-0.1);
        assert!(s.validate().is_err());
    }

    #[test]
    fn empty_target_speaker_is_rejected() {
        let mut cfg = PersonaConfig::default();
        cfg.dataset.target_speaker = " ".to_string();
        assert!(matches!(cfg.validate(), Err(PersonaError::InvalidConfig(_))));
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[dataset]
input_path = "in/transcript.jsonl"
target_speaker = "刘备"

[generation]
backend = "http"
endpoint = "http://127.0.0.1:8000/v1"

[generation.sampling]
max_tokens = 128
do_sample = false
"#
        )
        .unwrap();

        let cfg = PersonaConfig::load_from(Some(&path)).unwrap();
        assert_eq!(cfg.dataset.input_path, PathBuf::from("in/transcript.jsonl"));
        assert_eq!(cfg.dataset.target_speaker, "刘备");
        // Untouched keys keep their defaults.
        assert_eq!(cfg.dataset.output_path, PathBuf::from("data/孔明.json"));
        assert_eq!(cfg.generation.backend, GenerationBackend::Http);
        assert_eq!(cfg.generation.endpoint.as_deref(), Some("http://127.0.0.1:8000/v1"));
        assert_eq!(cfg.generation.sampling.max_tokens, 128);
        assert!(!cfg.generation.sampling.do_sample);
        assert_eq!(cfg.generation.sampling.top_k, Some(1));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(PersonaConfig::load_from(Some(&path)).is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("persona.toml");
        let mut cfg = PersonaConfig::default();
        cfg.dataset.target_speaker = "周瑜".to_string();
        cfg.generation.adapter = Some("zhouyu-lora".to_string());
        cfg.save_to_path(&path).unwrap();

        let loaded = PersonaConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.dataset.target_speaker, "周瑜");
        assert_eq!(loaded.generation.adapter.as_deref(), Some("zhouyu-lora"));
    }
}
