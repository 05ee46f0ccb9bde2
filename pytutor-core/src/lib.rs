//! # pytutor core library
//!
//! Everything the quiz and tutor surfaces need that does not touch the
//! network:
//!
//! - **Types**: quiz questions, options, chat messages, personas
//! - **Sanitizer**: strips `*`, `**` and backticks from generated text
//! - **Quiz parser**: strict text → [`Quiz`] conversion (exactly ten questions)
//! - **Sessions**: quiz progress and scoring, chat transcript
//! - **Config**: `pytutor.toml` with defaults for every field
//!
//! ## Flow
//!
//! ```text
//! UI event → prompt → generator (with retry) → sanitize → parse_quiz → session
//! ```

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod quiz;
pub mod sanitize;
pub mod session;
pub mod types;

pub use config::TutorConfig;
pub use error::{ParseError, SessionError, TutorError};
pub use quiz::parse_quiz;
pub use sanitize::sanitize;
pub use session::{AnswerOutcome, ChatTranscript, QuizSession};
pub use types::*;
