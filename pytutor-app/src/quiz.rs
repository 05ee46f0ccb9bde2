//! Quiz surface: generate a ten-question quiz for a level and play it.

use std::sync::Arc;

use pytutor_core::{AnswerOutcome, OptionLabel, QuizSession, SessionError, parse_quiz, sanitize};
use pytutor_llm::prompt::build_quiz_prompt;
use pytutor_llm::{CancelHandle, Generator, RetryPolicy};
use tracing::info;

use crate::surface::{Surface, SurfaceError, SurfaceKind, SurfaceStatus};

/// The quiz surface.
///
/// Each successful generation replaces the previous session wholesale;
/// nothing from an earlier quiz survives a new one.
pub struct QuizView<G: Generator> {
    surface: Surface<G>,
    session: Option<QuizSession>,
}

impl<G: Generator> QuizView<G> {
    #[must_use]
    pub fn new(generator: Arc<G>, policy: RetryPolicy) -> Self {
        Self {
            surface: Surface::new(SurfaceKind::Quiz, generator, policy),
            session: None,
        }
    }

    /// Request a new quiz for `level`.
    ///
    /// The current session is cleared before the request starts. Replies
    /// that are not exactly ten well-formed questions are retried.
    ///
    /// # Errors
    /// See [`Surface::run`].
    pub async fn generate(&mut self, level: &str) -> Result<&QuizSession, SurfaceError> {
        self.session = None;
        let quiz = self
            .surface
            .run(|| build_quiz_prompt(level), |text| parse_quiz(&sanitize(&text)))
            .await?;

        info!(level, questions = quiz.len(), "quiz ready");
        Ok(self.session.insert(QuizSession::new(quiz)))
    }

    /// Select an option for the current question.
    ///
    /// # Errors
    /// [`SessionError::NoQuiz`] before a quiz exists, otherwise whatever the
    /// session rejects.
    pub fn answer(&mut self, label: OptionLabel) -> Result<AnswerOutcome, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoQuiz)?.answer(label)
    }

    /// Move past the answered question.
    ///
    /// # Errors
    /// As for [`QuizView::answer`].
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.session.as_mut().ok_or(SessionError::NoQuiz)?.next()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> &SurfaceStatus {
        self.surface.status()
    }

    /// Terminal failure message of the last generation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.surface.error()
    }

    /// Whether the generate control should be disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.surface.is_busy()
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.surface.cancel_handle()
    }
}
