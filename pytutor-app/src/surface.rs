//! One UI surface with at most one generation request in flight.
//!
//! The quiz and tutor views are the same component underneath: a
//! [`Surface`] that builds a prompt, calls the generator through the retry
//! controller, and interprets the reply. `run` takes `&mut self`, so a
//! second request from the same surface cannot start while one is pending.

use std::fmt;
use std::sync::Arc;

use pytutor_llm::retry::{CancelHandle, CancelScope, RetryPolicy, with_retry};
use pytutor_llm::{Generator, RetryError};
use thiserror::Error;
use tracing::{debug, error, info};

/// Which surface a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Quiz generation.
    Quiz,
    /// Tutor chat.
    Tutor,
}

impl SurfaceKind {
    /// The user-visible message shown once every retry has failed.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Quiz => "Failed to generate quiz. Please try again.",
            Self::Tutor => "Failed to generate response. Please try again.",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiz => write!(f, "quiz"),
            Self::Tutor => write!(f, "tutor"),
        }
    }
}

/// What the surface should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight; the triggering control is disabled.
    Loading,
    /// The last request succeeded.
    Ready,
    /// The last request exhausted its retries.
    Failed(String),
    /// The last request was cancelled.
    Cancelled,
}

/// How a surface request ended without a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Every attempt failed. Carries the user-visible message only.
    #[error("{0}")]
    Terminal(String),

    /// The surface was cancelled (navigation, shutdown) mid-request.
    #[error("request cancelled")]
    Cancelled,
}

/// A parameterized UI surface bound to one generator.
pub struct Surface<G: Generator> {
    kind: SurfaceKind,
    generator: Arc<G>,
    policy: RetryPolicy,
    scope: CancelScope,
    status: SurfaceStatus,
}

impl<G: Generator> Surface<G> {
    #[must_use]
    pub fn new(kind: SurfaceKind, generator: Arc<G>, policy: RetryPolicy) -> Self {
        Self {
            kind,
            generator,
            policy,
            scope: CancelScope::new(),
            status: SurfaceStatus::Idle,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> &SurfaceStatus {
        &self.status
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status == SurfaceStatus::Loading
    }

    /// The terminal message of the last request, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SurfaceStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Handle for cancelling the in-flight request from elsewhere, e.g.
    /// when the user navigates away. Dropping the surface has the same effect.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.scope.handle()
    }

    /// Run one logical request: build the prompt, generate, interpret.
    ///
    /// The whole sequence is repeated on every retry, and a failure to
    /// interpret the reply counts as a failed attempt.
    ///
    /// # Errors
    /// [`SurfaceError::Terminal`] with the surface's generic message once
    /// the retry bound is reached; the specific reason is only logged.
    /// [`SurfaceError::Cancelled`] if the surface was cancelled.
    pub async fn run<T, E, P, I>(&mut self, mut build_prompt: P, interpret: I) -> Result<T, SurfaceError>
    where
        P: FnMut() -> String,
        I: Fn(String) -> Result<T, E>,
        E: fmt::Display,
    {
        self.scope.reset();
        self.status = SurfaceStatus::Loading;

        let kind = self.kind;
        let token = self.scope.token();
        let generator = &self.generator;
        let interpret = &interpret;

        let result = with_retry(&self.policy, &token, |attempt| {
            let prompt = build_prompt();
            async move {
                debug!(%kind, attempt, prompt_chars = prompt.len(), "requesting generation");
                match generator.generate(&prompt).await {
                    Ok(text) => interpret(text).map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
        })
        .await;

        match result {
            Ok(value) => {
                self.status = SurfaceStatus::Ready;
                Ok(value)
            }
            Err(RetryError::Exhausted { attempts, last_error }) => {
                error!(%kind, attempts, "request failed: {}", last_error);
                let message = kind.failure_message().to_string();
                self.status = SurfaceStatus::Failed(message.clone());
                Err(SurfaceError::Terminal(message))
            }
            Err(RetryError::Cancelled { attempts }) => {
                info!(%kind, attempts, "request cancelled");
                self.status = SurfaceStatus::Cancelled;
                Err(SurfaceError::Cancelled)
            }
        }
    }
}
