//! Configuration for pytutor.
//!
//! Maps directly to `pytutor.toml`. Every field has a default, so an empty
//! document is a valid configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};
use crate::types::Persona;

/// Environment variable that overrides `llm.api_key`.
pub const API_KEY_ENV: &str = "PYTUTOR_API_KEY";

/// Environment variable that overrides `llm.model`.
pub const MODEL_ENV: &str = "PYTUTOR_MODEL";

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Generation collaborator settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Retry policy shared by the quiz and tutor surfaces.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Tutor defaults.
    #[serde(default)]
    pub tutor: TutorDefaults,
}

impl TutorConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `TutorError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| TutorError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Apply `PYTUTOR_API_KEY` / `PYTUTOR_MODEL` from the process environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Which generation backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API.
    #[default]
    Gemini,
    /// Ollama running locally.
    Ollama,
    /// Any OpenAI-compatible chat completions endpoint.
    #[serde(alias = "openai_compatible")]
    OpenAi,
    /// No backend; every call fails.
    None,
}

/// Generation collaborator settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Backend provider.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Base URL for the provider API. Empty means the provider's default.
    #[serde(default)]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key. Prefer `PYTUTOR_API_KEY` over writing it to disk.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl LlmConfig {
    /// Base URL, falling back to the provider default when unset.
    #[must_use]
    pub fn resolved_base_url(&self) -> &str {
        if !self.base_url.trim().is_empty() {
            return self.base_url.trim_end_matches('/');
        }
        match self.provider {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::Ollama => "http://localhost:11434",
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::None => "",
        }
    }

    /// Request timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: String::new(),
            model: default_model(),
            api_key: None,
            request_timeout_ms: None,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Re-attempts after the first failure before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between attempts in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl RetryConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Defaults for the tutor surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorDefaults {
    /// Learner level embedded into prompts.
    #[serde(default = "default_level")]
    pub level: String,
    /// Prompt tone.
    #[serde(default)]
    pub persona: Persona,
}

impl Default for TutorDefaults {
    fn default() -> Self {
        Self {
            level: default_level(),
            persona: Persona::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde requires named functions)
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_max_retries() -> u32 {
    100
}
fn default_delay_ms() -> u64 {
    1000
}
fn default_level() -> String {
    "beginner".to_string()
}
