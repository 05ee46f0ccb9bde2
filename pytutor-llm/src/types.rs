//! Core types for generation requests and responses.

use serde::{Deserialize, Serialize};

/// A completed generation.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// The generated text, unsanitized.
    pub text: String,
    /// Wall-clock latency in milliseconds.
    pub latency_ms: u64,
    /// Which model produced it.
    pub model: String,
}

// ---------------------------------------------------------------------------
// Gemini wire format (generateContent)
// ---------------------------------------------------------------------------

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub(crate) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    pub fn single_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Response body of `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiPromptFeedback {
    pub block_reason: Option<String>,
}
