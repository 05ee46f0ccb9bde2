//! # pytutor-llm — Generation Layer for pytutor
//!
//! Provides a unified interface for text generation across backends:
//!   - **Gemini** (Google Generative Language API, default)
//!   - **Ollama** (local)
//!   - **OpenAI-compatible API**
//!
//! All generation calls in pytutor go through this crate, ensuring:
//!   - Prompts come from fixed, tested templates
//!   - The API key is injected from configuration, never hard-coded
//!   - Retry with a fixed delay and a shared bound
//!   - Pending retries are cancelled when the owning surface goes away
//!
//! # Call path
//!
//! ```text
//! prompt::build_*  ──▶  retry::with_retry( Generator::generate )  ──▶  text
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod retry;
pub mod scripted;
pub mod types;

pub use client::{Generator, LlmClient, LlmProvider};
pub use error::{LlmError, RetryError};
pub use retry::{CancelHandle, CancelScope, CancelToken, RetryPolicy, with_retry};
pub use scripted::ScriptedGenerator;
pub use types::GenerationResponse;
