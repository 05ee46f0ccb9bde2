//! Per-surface session state: quiz progress/score and the chat transcript.

use crate::error::SessionError;
use crate::types::{ChatMessage, OptionLabel, Quiz, QuizQuestion};

// ---------------------------------------------------------------------------
// Quiz session
// ---------------------------------------------------------------------------

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// The label the learner picked.
    pub selected: OptionLabel,
    /// The correct label.
    pub correct: OptionLabel,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// Progress through one generated quiz.
///
/// Replaced wholesale whenever a new quiz is generated.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    index: usize,
    selected: Option<OptionLabel>,
    score: u32,
    finished: bool,
}

impl QuizSession {
    /// Start at the first question with a zero score.
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            index: 0,
            selected: None,
            score: 0,
            finished: false,
        }
    }

    /// The question currently shown.
    #[must_use]
    pub fn current(&self) -> &QuizQuestion {
        &self.quiz.questions()[self.index]
    }

    /// `(1-based position, total)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.quiz.len())
    }

    /// The answer picked for the current question, if any. Once set, the
    /// correct answer is revealed.
    #[must_use]
    pub fn selected(&self) -> Option<OptionLabel> {
        self.selected
    }

    /// Whether the current question's answer is revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the current question is the last one.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.quiz.len()
    }

    /// `(correct answers, total questions)`.
    #[must_use]
    pub fn score(&self) -> (u32, usize) {
        (self.score, self.quiz.len())
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Record an answer for the current question and reveal the correct one.
    ///
    /// # Errors
    /// [`SessionError::Finished`] after the last question, or
    /// [`SessionError::AlreadyAnswered`] if this question has an answer.
    pub fn answer(&mut self, label: OptionLabel) -> Result<AnswerOutcome, SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }
        if self.selected.is_some() {
            return Err(SessionError::AlreadyAnswered(self.index + 1));
        }

        let correct = self.current().correct_label();
        self.selected = Some(label);
        if label == correct {
            self.score += 1;
        }
        Ok(AnswerOutcome {
            selected: label,
            correct,
        })
    }

    /// Move to the next question, or finish the quiz after the last one.
    ///
    /// # Errors
    /// [`SessionError::Finished`] if already finished, or
    /// [`SessionError::NotAnswered`] if the current question has no answer.
    pub fn next(&mut self) -> Result<(), SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }
        if self.selected.is_none() {
            return Err(SessionError::NotAnswered(self.index + 1));
        }

        if self.is_last() {
            self.finished = true;
        } else {
            self.index += 1;
            self.selected = None;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Chat transcript
// ---------------------------------------------------------------------------

/// Append-only list of chat messages, cleared only by [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message.
    pub fn reset(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QUIZ_LENGTH, QuizOption, Role};

    fn quiz() -> Quiz {
        let q = QuizQuestion::new(
            "What does len([1, 2]) return?",
            [
                QuizOption::new(OptionLabel::A, "1"),
                QuizOption::new(OptionLabel::B, "2"),
                QuizOption::new(OptionLabel::C, "3"),
                QuizOption::new(OptionLabel::D, "an error"),
            ],
            OptionLabel::B,
        )
        .expect("valid question");
        Quiz::new(vec![q; QUIZ_LENGTH]).expect("ten questions")
    }

    #[test]
    fn scores_correct_answers_only() {
        let mut session = QuizSession::new(quiz());
        let outcome = session.answer(OptionLabel::B).expect("first answer");
        assert!(outcome.is_correct());
        session.next().expect("advance");

        let outcome = session.answer(OptionLabel::A).expect("second answer");
        assert!(!outcome.is_correct());
        assert_eq!(outcome.correct, OptionLabel::B);
        assert_eq!(session.score(), (1, QUIZ_LENGTH));
        assert_eq!(session.position(), (2, QUIZ_LENGTH));
    }

    #[test]
    fn cannot_answer_twice_or_skip() {
        let mut session = QuizSession::new(quiz());
        assert_eq!(session.next(), Err(SessionError::NotAnswered(1)));
        session.answer(OptionLabel::C).expect("answer");
        assert_eq!(session.answer(OptionLabel::B), Err(SessionError::AlreadyAnswered(1)));
        assert_eq!(session.score().0, 0);
    }

    #[test]
    fn finishes_after_last_question() {
        let mut session = QuizSession::new(quiz());
        for _ in 0..QUIZ_LENGTH {
            assert!(!session.is_finished());
            session.answer(OptionLabel::B).expect("answer");
            session.next().expect("next");
        }
        assert!(session.is_finished());
        assert_eq!(session.score(), (10, 10));
        assert_eq!(session.position(), (10, 10));
        assert_eq!(session.answer(OptionLabel::A), Err(SessionError::Finished));
        assert_eq!(session.next(), Err(SessionError::Finished));
    }

    #[test]
    fn transcript_keeps_order_until_reset() {
        let mut transcript = ChatTranscript::new();
        transcript.push_user("What is a list?");
        transcript.push_assistant("A list is an ordered, mutable collection.");
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].role(), Role::User);
        assert_eq!(transcript.last().map(ChatMessage::role), Some(Role::Assistant));

        transcript.reset();
        assert!(transcript.is_empty());
    }
}
