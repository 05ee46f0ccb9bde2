//! Scripted generator — replays queued replies in order.
//!
//! Stands in for the network in tests and benchmarks. Each call pops the
//! next scripted outcome and records the prompt it was given; once the
//! script runs out every call fails with [`LlmError::Unavailable`].

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::Generator;
use crate::error::LlmError;

/// One scripted outcome.
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// A [`Generator`] that replays a fixed script.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<String>>,
    latency: Option<Duration>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Scripted::Reply(text.into()));
        self
    }

    /// Queue `n` failures with the same message.
    #[must_use]
    pub fn fail_times(self, n: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        self.script
            .lock()
            .extend(std::iter::repeat_n(Scripted::Fail(message), n));
        self
    }

    /// Sleep this long before answering each call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Every prompt received, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Scripted outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(LlmError::RequestFailed(message)),
            None => Err(LlmError::Unavailable("script exhausted".into())),
        }
    }
}
