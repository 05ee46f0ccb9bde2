//! Error types for the pytutor core library.

use thiserror::Error;

/// Why a block of generated quiz text was rejected.
///
/// The generator is free-text, so the parser is strict: anything that does
/// not match the expected layout is rejected and left to the caller's retry
/// policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An option line lacks `") "`, carries a label outside A–D, or repeats a label.
    #[error("malformed option in question {question}: {line:?}")]
    MalformedOption {
        /// 1-based question index.
        question: usize,
        /// The offending line, trimmed.
        line: String,
    },

    /// Fewer than five lines follow the question, or the fifth is not `Correct: <letter>`.
    #[error("missing correct-answer line in question {question}")]
    MissingAnswerLine {
        /// 1-based question index.
        question: usize,
    },

    /// A numbered block has no text at all.
    #[error("empty question {question}")]
    EmptyQuestion {
        /// 1-based question index.
        question: usize,
    },

    /// The text did not contain exactly the expected number of questions.
    #[error("wrong question count: expected {expected}, found {found}")]
    WrongQuestionCount {
        /// Required count.
        expected: usize,
        /// Count actually parsed.
        found: usize,
    },
}

impl ParseError {
    /// Short, stable reason string without positional detail.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedOption { .. } => "malformed option",
            Self::MissingAnswerLine { .. } => "missing correct-answer line",
            Self::EmptyQuestion { .. } => "empty question",
            Self::WrongQuestionCount { .. } => "wrong question count",
        }
    }
}

/// Misuse of a [`QuizSession`](crate::session::QuizSession).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The current question already has an answer.
    #[error("question {0} has already been answered")]
    AlreadyAnswered(usize),

    /// Advancing before answering.
    #[error("question {0} has not been answered yet")]
    NotAnswered(usize),

    /// The quiz is over.
    #[error("quiz is already finished")]
    Finished,

    /// No quiz has been generated yet.
    #[error("no quiz has been generated")]
    NoQuiz,
}

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generated quiz text could not be parsed.
    #[error("Quiz parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid quiz session transition.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, TutorError>;
