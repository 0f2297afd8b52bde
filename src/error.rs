//! Error types shared across the quiz modules.
use thiserror::Error;

use crate::session::Phase;

/// Input rejected at a prompt. Shown to the user, who can re-enter the value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingCredentials,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a topic for the quiz")]
    EmptyTopic,
    #[error("Number of questions must be one of 3, 5, 10 or 15 (got '{given}')")]
    QuestionCount { given: String },
    #[error("Difficulty must be easy, medium or hard (got '{given}')")]
    Difficulty { given: String },
}

/// Errors emitted by `QuizSession` transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {op} while the quiz is {phase}")]
    InvalidTransition { op: &'static str, phase: Phase },
    #[error("question {} has no answer selected", .index + 1)]
    UnansweredQuestion { index: usize },
    #[error("option {option} is out of range")]
    OptionOutOfRange { option: usize },
    #[error("the quiz has no questions")]
    EmptyQuiz,
}

/// Errors emitted by the SQLite history store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
