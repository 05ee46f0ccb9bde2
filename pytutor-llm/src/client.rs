//! Generation client — unified interface for Gemini, Ollama and
//! OpenAI-compatible backends.
//!
//! A call here is a single HTTP attempt. Retrying is the job of
//! [`with_retry`](crate::retry::with_retry), which re-runs the whole
//! operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pytutor_core::config::{LlmConfig, ProviderKind};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{GeminiRequest, GeminiResponse, GenerationResponse};

/// Longest error body kept in [`LlmError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// Anything that turns a prompt into text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for Arc<G> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

/// Provider backend for generation.
#[derive(Clone)]
pub enum LlmProvider {
    /// Google Generative Language API.
    Gemini { base_url: String, api_key: String },
    /// Ollama running locally.
    Ollama { base_url: String },
    /// OpenAI-compatible API.
    OpenAiCompatible { base_url: String, api_key: String },
    /// No backend; every call returns an error.
    None,
}

impl std::fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini { base_url, .. } => write!(f, "Gemini({base_url})"),
            Self::Ollama { base_url } => write!(f, "Ollama({base_url})"),
            Self::OpenAiCompatible { base_url, .. } => write!(f, "OpenAiCompatible({base_url})"),
            Self::None => write!(f, "None"),
        }
    }
}

/// The HTTP generation client.
#[derive(Debug)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    timeout: Option<Duration>,
}

impl LlmClient {
    /// Create a new client without a request timeout.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Create a client with no backend (all calls fail).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new())
    }

    /// Build a client from configuration. The API key is injected here and
    /// nowhere else.
    ///
    /// # Errors
    /// Returns [`LlmError::Config`] if the provider needs an API key and
    /// none is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = config.resolved_base_url().to_string();
        let api_key = || {
            config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    LlmError::Config(format!(
                        "provider {:?} requires an API key (set llm.api_key or {})",
                        config.provider,
                        pytutor_core::config::API_KEY_ENV
                    ))
                })
        };

        let provider = match config.provider {
            ProviderKind::Gemini => LlmProvider::Gemini {
                base_url,
                api_key: api_key()?,
            },
            ProviderKind::Ollama => LlmProvider::Ollama { base_url },
            ProviderKind::OpenAi => LlmProvider::OpenAiCompatible {
                base_url,
                // Local OpenAI-compatible servers usually accept any key.
                api_key: config.api_key.clone().unwrap_or_default(),
            },
            ProviderKind::None => LlmProvider::None,
        };

        let mut client = Self::new(provider, config.model.clone());
        client.timeout = config.request_timeout();
        Ok(client)
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a response, with latency and model metadata.
    ///
    /// # Errors
    /// Returns an [`LlmError`] if the backend is unavailable, answers with
    /// an error status, or returns no text.
    pub async fn generate_detailed(&self, prompt: &str) -> Result<GenerationResponse, LlmError> {
        let start = Instant::now();
        let text = match &self.provider {
            LlmProvider::None => {
                return Err(LlmError::Unavailable("No generation provider configured".into()));
            }
            LlmProvider::Gemini { base_url, api_key } => {
                self.generate_gemini(base_url, api_key, prompt).await?
            }
            LlmProvider::Ollama { base_url } => self.generate_ollama(base_url, prompt).await?,
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                self.generate_openai(base_url, api_key, prompt).await?
            }
        };

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            model = %self.model,
            latency_ms,
            prompt_chars = prompt.len(),
            reply_chars = text.len(),
            "generation complete"
        );

        Ok(GenerationResponse {
            text,
            latency_ms,
            model: self.model.clone(),
        })
    }

    /// Generate using the Gemini `generateContent` endpoint.
    async fn generate_gemini(
        &self,
        base_url: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/models/{}:generateContent", base_url, self.model);
        let request = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GeminiRequest::single_prompt(prompt));

        let json = self.send(request).await?;
        extract_gemini_text(json)
    }

    /// Generate using Ollama's API.
    async fn generate_ollama(&self, base_url: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let json = self.send(self.http.post(&url).json(&body)).await?;
        non_empty(json["response"].as_str())
    }

    /// Generate using an OpenAI-compatible API.
    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt },
            ],
        });

        let mut request = self.http.post(&url).json(&body);
        if !api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }
        let json = self.send(request).await?;
        non_empty(json["choices"][0]["message"]["content"].as_str())
    }

    /// Send one request and decode a JSON body, mapping non-success statuses.
    async fn send(&self, mut request: RequestBuilder) -> Result<Value, LlmError> {
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await.map_err(|e| {
            let err = LlmError::from(e);
            warn!("Generation request failed: {}", err);
            err
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncate(resp.text().await.unwrap_or_default());
            warn!("Generation API returned HTTP {}", status);
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Generator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate_detailed(prompt).await.map(|r| r.text)
    }
}

/// Pull the reply text out of a Gemini `generateContent` response.
///
/// All text parts of the first candidate are concatenated.
pub(crate) fn extract_gemini_text(json: Value) -> Result<String, LlmError> {
    let response: GeminiResponse =
        serde_json::from_value(json).map_err(|e| LlmError::Decode(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(LlmError::Decode(format!("prompt blocked: {reason}")));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    non_empty(Some(text.as_str()))
}

fn non_empty(text: Option<&str>) -> Result<String, LlmError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(LlmError::EmptyResponse),
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
