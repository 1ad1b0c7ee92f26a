#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod history;
pub mod quiz_service;
pub mod sessions;
pub mod share;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::{BankSource, QuizServices};
pub use error::{AppServicesError, QuizServiceError, SessionError, StateViolation};
pub use history::{QuizHistoryItem, QuizHistoryService, QuizStats};
pub use quiz_service::{QuizAttempt, QuizService};
pub use share::{recap_line, share_text};

pub use sessions::{
    AdvanceOutcome, AnswerFeedback, QuestionView, QuizHandle, QuizRunner, QuizSession,
    SessionStatus, SessionView, TickOutcome, TickSource,
};
