mod answer;
mod bank;
mod builtin;
mod difficulty;
mod performance;
mod question;
mod results;
mod rules;
mod summary;

pub use answer::Answer;
pub use bank::{BankError, QuestionBank};
pub use difficulty::{Difficulty, DifficultyError};
pub use performance::PerformanceTier;
pub use question::{Question, QuestionError};
pub use results::{CompletionReason, QuestionReview, QuizResults};
pub use rules::QuizRules;
pub use summary::{QuizSummary, QuizSummaryError};
