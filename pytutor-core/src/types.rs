//! Core data types shared by the quiz and tutor surfaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Number of questions in every generated quiz.
pub const QUIZ_LENGTH: usize = 10;

/// Number of options attached to every quiz question.
pub const OPTIONS_PER_QUESTION: usize = 4;

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// Letter identifying one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// All labels in display order.
    pub const ALL: [OptionLabel; OPTIONS_PER_QUESTION] = [Self::A, Self::B, Self::C, Self::D];

    /// Parse a single letter, case-insensitively.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Upper-case letter for this label.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| format!("unknown option label: '{s}'")),
            _ => Err(format!("unknown option label: '{s}'")),
        }
    }
}

/// One answer option of a quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Which letter this option is shown under.
    pub label: OptionLabel,
    /// The option text.
    pub text: String,
}

impl QuizOption {
    /// Create a new option.
    #[must_use]
    pub fn new(label: OptionLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

impl fmt::Display for QuizOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.label, self.text)
    }
}

/// A single multiple-choice question.
///
/// Always carries four options with distinct labels, and the correct label
/// is one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    question_text: String,
    options: [QuizOption; OPTIONS_PER_QUESTION],
    correct_label: OptionLabel,
}

impl QuizQuestion {
    /// Build a question, returning `None` if the text is empty, a label is
    /// repeated, or `correct_label` names no option.
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        options: [QuizOption; OPTIONS_PER_QUESTION],
        correct_label: OptionLabel,
    ) -> Option<Self> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return None;
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.label == option.label) {
                return None;
            }
        }
        if !options.iter().any(|o| o.label == correct_label) {
            return None;
        }
        Some(Self {
            question_text,
            options,
            correct_label,
        })
    }

    /// The question prompt.
    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    /// The four options, in the order the generator listed them.
    #[must_use]
    pub fn options(&self) -> &[QuizOption; OPTIONS_PER_QUESTION] {
        &self.options
    }

    /// The label of the correct option.
    #[must_use]
    pub fn correct_label(&self) -> OptionLabel {
        self.correct_label
    }

    /// Look up an option by label.
    #[must_use]
    pub fn option(&self, label: OptionLabel) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.label == label)
    }

    /// The correct option.
    #[must_use]
    pub fn correct_option(&self) -> &QuizOption {
        // `new` guarantees the correct label is present.
        self.option(self.correct_label).unwrap_or(&self.options[0])
    }

    /// Whether `label` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, label: OptionLabel) -> bool {
        label == self.correct_label
    }
}

/// An ordered set of exactly [`QUIZ_LENGTH`] questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Wrap parsed questions into a quiz.
    ///
    /// # Errors
    /// Returns [`ParseError::WrongQuestionCount`] unless exactly
    /// [`QUIZ_LENGTH`] questions are supplied.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, ParseError> {
        if questions.len() != QUIZ_LENGTH {
            return Err(ParseError::WrongQuestionCount {
                expected: QUIZ_LENGTH,
                found: questions.len(),
            });
        }
        Ok(Self { questions })
    }

    /// All questions, in order.
    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Question at a 0-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    /// Always [`QUIZ_LENGTH`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Never true for a constructed quiz.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The learner.
    User,
    /// The tutor.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in a chat transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    /// A message written by the learner.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A message written by the tutor.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Prompt-tone variant for the tutor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Patient, structured explanations.
    #[default]
    Standard,
    /// Relaxed, conversational tone.
    Casual,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Casual => write!(f, "casual"),
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "casual" => Ok(Self::Casual),
            _ => Err(format!("unknown persona: '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [QuizOption; 4] {
        [
            QuizOption::new(OptionLabel::A, "3"),
            QuizOption::new(OptionLabel::B, "4"),
            QuizOption::new(OptionLabel::C, "5"),
            QuizOption::new(OptionLabel::D, "6"),
        ]
    }

    #[test]
    fn option_label_parses_case_insensitively() {
        assert_eq!("b".parse::<OptionLabel>(), Ok(OptionLabel::B));
        assert_eq!(" D ".parse::<OptionLabel>(), Ok(OptionLabel::D));
        assert!("E".parse::<OptionLabel>().is_err());
        assert!("AB".parse::<OptionLabel>().is_err());
        assert!("".parse::<OptionLabel>().is_err());
    }

    #[test]
    fn question_requires_present_correct_label() {
        let mut opts = options();
        opts[3] = QuizOption::new(OptionLabel::C, "6");
        assert!(QuizQuestion::new("What is 2+2?", opts, OptionLabel::B).is_none());
        assert!(QuizQuestion::new("", options(), OptionLabel::B).is_none());

        let q = QuizQuestion::new("What is 2+2?", options(), OptionLabel::B).expect("valid");
        assert_eq!(q.correct_option().text, "4");
        assert!(q.is_correct(OptionLabel::B));
        assert!(!q.is_correct(OptionLabel::A));
    }

    #[test]
    fn question_rejects_correct_label_missing_from_options() {
        let opts = [
            QuizOption::new(OptionLabel::A, "3"),
            QuizOption::new(OptionLabel::B, "4"),
            QuizOption::new(OptionLabel::C, "5"),
            QuizOption::new(OptionLabel::C, "6"),
        ];
        assert!(QuizQuestion::new("q", opts, OptionLabel::D).is_none());
    }

    #[test]
    fn quiz_requires_exact_length() {
        let q = QuizQuestion::new("q", options(), OptionLabel::A).expect("valid");
        let err = Quiz::new(vec![q.clone(); 9]).expect_err("nine questions");
        assert_eq!(err.reason(), "wrong question count");
        assert_eq!(Quiz::new(vec![q; QUIZ_LENGTH]).expect("ten").len(), QUIZ_LENGTH);
    }

    #[test]
    fn persona_round_trip() {
        for p in [Persona::Standard, Persona::Casual] {
            assert_eq!(p.to_string().parse::<Persona>(), Ok(p));
        }
        assert!("grumpy".parse::<Persona>().is_err());
    }
}
