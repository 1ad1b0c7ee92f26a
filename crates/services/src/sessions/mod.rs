mod engine;
mod runner;
mod ticker;
mod view;

// Public API of the session subsystem.
pub use crate::error::{SessionError, StateViolation};
pub use engine::{AdvanceOutcome, AnswerFeedback, QuizSession, SessionStatus, TickOutcome};
pub use runner::{QuizHandle, QuizRunner};
pub use ticker::TickSource;
pub use view::{QuestionView, SessionView};
