//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuizSummaryError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why an operation was refused in the session's current state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateViolation {
    #[error("no quiz session has been started")]
    NoSession,
    #[error("session already completed")]
    SessionCompleted,
    #[error("session is still active")]
    SessionActive,
    #[error("question {index} already has a response; advance or go back first")]
    AlreadyResponded { index: usize },
    #[error("already at the first question")]
    AtFirstQuestion,
}

/// Errors emitted by the quiz session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no usable question partition in the question bank")]
    EmptyQuestionBank,
    #[error("invalid state: {0}")]
    InvalidState(StateViolation),
    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}

/// Errors emitted by `QuizService`, `QuizHistoryService` and the quiz runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Summary(#[from] QuizSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("quiz runner is no longer running")]
    RunnerClosed,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error("failed to read question bank {path}: {source}")]
    BankFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
