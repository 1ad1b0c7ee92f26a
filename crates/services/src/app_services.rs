use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizRules};
use storage::repository::Storage;
use tracing::debug;

use crate::Clock;
use crate::error::AppServicesError;
use crate::history::QuizHistoryService;
use crate::quiz_service::QuizService;

/// Where the question bank comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    Builtin,
    File(String),
}

impl BankSource {
    /// Load and validate the bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::BankFile` if the file cannot be read and
    /// `AppServicesError::Bank` if its contents are not a valid bank.
    pub fn load(&self) -> Result<QuestionBank, AppServicesError> {
        match self {
            Self::Builtin => Ok(QuestionBank::builtin()?),
            Self::File(path) => {
                let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| {
                    AppServicesError::BankFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(QuestionBank::from_json(&raw)?)
            }
        }
    }
}

/// Assembles the quiz and history services over one storage backend.
#[derive(Clone)]
pub struct QuizServices {
    quiz: Arc<QuizService>,
    history: Arc<QuizHistoryService>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or bank loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: &BankSource,
        rules: QuizRules,
    ) -> Result<Self, AppServicesError> {
        let bank = bank.load()?;
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, bank, rules))
    }

    /// In-memory storage; nothing survives the process.
    #[must_use]
    pub fn in_memory(clock: Clock, bank: QuestionBank, rules: QuizRules) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, bank, rules)
    }

    fn from_storage(storage: &Storage, clock: Clock, bank: QuestionBank, rules: QuizRules) -> Self {
        debug!(questions = bank.len(), "question bank loaded");
        let quiz = QuizService::new(clock, Arc::new(bank), Arc::clone(&storage.quiz_results))
            .with_rules(rules);
        let history = QuizHistoryService::new(Arc::clone(&storage.quiz_results));
        Self {
            quiz: Arc::new(quiz),
            history: Arc::new(history),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn history(&self) -> Arc<QuizHistoryService> {
        Arc::clone(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizServiceError;
    use quiz_core::model::{BankError, Difficulty};
    use quiz_core::time::fixed_clock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn missing_bank_file_reports_path() {
        let err = BankSource::File("/nonexistent/quiz-bank.json".into())
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            AppServicesError::BankFile { ref path, .. } if path == "/nonexistent/quiz-bank.json"
        ));
    }

    #[test]
    fn malformed_bank_file_is_a_bank_error() {
        let path = std::env::temp_dir().join(format!("quiz-bank-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = BankSource::File(path.display().to_string())
            .load()
            .unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, AppServicesError::Bank(BankError::Parse(_))));
    }

    #[tokio::test]
    async fn quiz_and_history_share_storage() {
        let services = QuizServices::in_memory(
            fixed_clock(),
            BankSource::Builtin.load().unwrap(),
            QuizRules {
                max_questions: 2,
                time_budget_secs: 60,
            },
        );
        let quiz = services.quiz();
        let mut attempt = quiz
            .start_attempt(Difficulty::Beginner, &mut StdRng::seed_from_u64(4))
            .unwrap();
        while !attempt.session().is_complete() {
            attempt.session_mut().skip_current().unwrap();
            attempt.session_mut().advance().unwrap();
        }
        quiz.archive(&mut attempt).await.unwrap();

        let items = services.history().list_recent(None, 5).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total, 2);
        assert_eq!(items[0].skipped, 2);

        let stats: Result<_, QuizServiceError> = services.history().stats(None, 5).await;
        assert_eq!(stats.unwrap().attempts, 1);
    }
}
