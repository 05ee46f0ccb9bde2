//! Tutor surface: a running conversation with the generator.

use std::sync::Arc;

use pytutor_core::{ChatMessage, ChatTranscript, Persona, sanitize};
use pytutor_llm::prompt::build_tutor_prompt;
use pytutor_llm::{CancelHandle, Generator, RetryPolicy};
use tracing::debug;

use crate::surface::{Surface, SurfaceError, SurfaceKind, SurfaceStatus};

/// Sent on the user's behalf when a conversation opens.
pub const OPENING_LINE: &str = "I want to learn Python!";

/// The tutor chat surface.
///
/// Only the latest user message is sent to the generator; the transcript
/// is kept for display.
pub struct TutorView<G: Generator> {
    surface: Surface<G>,
    persona: Persona,
    level: String,
    transcript: ChatTranscript,
}

impl<G: Generator> TutorView<G> {
    #[must_use]
    pub fn new(generator: Arc<G>, policy: RetryPolicy, persona: Persona, level: impl Into<String>) -> Self {
        Self {
            surface: Surface::new(SurfaceKind::Tutor, generator, policy),
            persona,
            level: level.into(),
            transcript: ChatTranscript::new(),
        }
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn set_level(&mut self, level: impl Into<String>) {
        self.level = level.into();
    }

    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Open the conversation with [`OPENING_LINE`] if nothing was said yet.
    ///
    /// # Errors
    /// See [`TutorView::send`].
    pub async fn start(&mut self) -> Result<Option<&ChatMessage>, SurfaceError> {
        if !self.transcript.is_empty() {
            return Ok(None);
        }
        self.send(OPENING_LINE).await
    }

    /// Append `input` as a user message and wait for the tutor's reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`. On failure the user
    /// message stays in the transcript with no reply after it.
    ///
    /// # Errors
    /// See [`Surface::run`].
    pub async fn send(&mut self, input: &str) -> Result<Option<&ChatMessage>, SurfaceError> {
        if input.trim().is_empty() {
            debug!("ignoring blank input");
            return Ok(None);
        }

        self.transcript.push_user(input);
        let level = self.level.as_str();
        let persona = self.persona;

        let reply = self
            .surface
            .run(
                || build_tutor_prompt(level, persona, input),
                |text| {
                    let clean = sanitize(&text);
                    if clean.is_empty() { Err("empty reply") } else { Ok(clean) }
                },
            )
            .await?;

        self.transcript.push_assistant(reply);
        Ok(self.transcript.last())
    }

    /// Forget the conversation.
    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    #[must_use]
    pub fn status(&self) -> &SurfaceStatus {
        self.surface.status()
    }

    /// Terminal failure message of the last request, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.surface.error()
    }

    /// Whether the send control should be disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.surface.is_busy()
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.surface.cancel_handle()
    }
}
