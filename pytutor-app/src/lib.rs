//! # pytutor-app — Quiz and Tutor Surfaces
//!
//! The two user-facing surfaces of pytutor, both built on one
//! [`surface::Surface`]: a prompt builder, the shared retry controller, and
//! an interpreter for the reply.
//!
//! - [`quiz::QuizView`] generates a ten-question quiz and tracks the score.
//! - [`tutor::TutorView`] keeps a chat transcript in one of two personas.
//! - [`interrupt::Interrupt`] routes Ctrl-C to the pending request.

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod interrupt;
pub mod quiz;
pub mod surface;
pub mod tutor;

pub use interrupt::Interrupt;
pub use quiz::QuizView;
pub use surface::{Surface, SurfaceError, SurfaceKind, SurfaceStatus};
pub use tutor::{OPENING_LINE, TutorView};
