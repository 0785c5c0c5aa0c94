//! Quiz error and notice types.
//!
//! `LoadFailure` and `NoQuestionsAvailable` are the only errors a user should
//! ever see; a bad answer key reaches users as a `LoadFailure`. The state and
//! choice variants are contract violations between the engine and the session
//! and are treated as defects.

use std::fmt;

use thiserror::Error;

use crate::session::SessionState;

/// Errors raised by the quiz core.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The question bank could not be fetched or parsed.
    #[error("failed to load questions: {0}")]
    LoadFailure(String),

    /// The bank loaded but contains no questions.
    #[error("no questions available")]
    NoQuestionsAvailable,

    /// An operation was called in a state that does not allow it.
    #[error("invalid state transition: {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: SessionState,
    },

    /// A question whose correct index does not name one of its choices.
    #[error("question {question}: correct index {correct} outside {choices} answers")]
    InvalidAnswerKey {
        question: usize,
        correct: usize,
        choices: usize,
    },

    /// A display index outside the active item's choices.
    #[error("choice {index} out of range ({choices} choices)")]
    ChoiceOutOfRange { index: usize, choices: usize },
}

impl QuizError {
    /// Returns `true` if this error should be shown to the user and aborts start.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            QuizError::LoadFailure(_) | QuizError::NoQuestionsAvailable
        )
    }
}

/// Non-blocking, informational conditions surfaced to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Fewer questions exist than were requested; the session was clamped.
    InsufficientQuestions { requested: usize, available: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InsufficientQuestions {
                requested,
                available,
            } => write!(
                f,
                "Only {available} questions available. Starting with {available} questions \
                 ({requested} requested)."
            ),
        }
    }
}
