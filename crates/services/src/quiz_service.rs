use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use quiz_core::model::{Difficulty, QuestionBank, QuizRules, QuizSummary};
use storage::repository::{InMemoryRepository, QuizResultRepository, QuizSummaryId};

use crate::Clock;
use crate::error::QuizServiceError;
use crate::sessions::QuizSession;

/// A running or finished session plus the bookkeeping needed to archive it.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    session: QuizSession,
    requested: Difficulty,
    started_at: DateTime<Utc>,
    summary_id: Option<QuizSummaryId>,
}

impl QuizAttempt {
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    /// Tier the caller asked for; may differ from `session().difficulty()` after fallback.
    #[must_use]
    pub fn requested(&self) -> Difficulty {
        self.requested
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn summary_id(&self) -> Option<QuizSummaryId> {
        self.summary_id
    }
}

/// Starts sessions from the shared question bank and archives finished ones.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    rules: QuizRules,
    results: Arc<dyn QuizResultRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        results: Arc<dyn QuizResultRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            rules: QuizRules::default(),
            results,
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock, bank: Arc<QuestionBank>) -> Self {
        Self::new(clock, bank, Arc::new(InMemoryRepository::new()))
    }

    #[must_use]
    pub fn with_rules(mut self, rules: QuizRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn rules(&self) -> QuizRules {
        self.rules
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Draw a fresh session for `difficulty`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` with `EmptyQuestionBank` when no usable
    /// partition exists.
    pub fn start_attempt<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<QuizAttempt, QuizServiceError> {
        let session = QuizSession::start_with_rules(difficulty, &self.bank, self.rules, rng)?;
        if session.difficulty() != difficulty {
            warn!(
                requested = %difficulty,
                used = %session.difficulty(),
                "requested tier has no questions, using fallback"
            );
        }
        info!(
            difficulty = %session.difficulty(),
            questions = session.total(),
            time_budget_secs = self.rules.time_budget_secs,
            "quiz session started"
        );

        Ok(QuizAttempt {
            session,
            requested: difficulty,
            started_at: self.clock.now(),
            summary_id: None,
        })
    }

    /// Persist the summary of a completed attempt. Calling it again returns the same id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` if the session is still active,
    /// `QuizServiceError::Summary` for inconsistent data and
    /// `QuizServiceError::Storage` on repository failures.
    pub async fn archive(&self, attempt: &mut QuizAttempt) -> Result<QuizSummaryId, QuizServiceError> {
        if let Some(id) = attempt.summary_id {
            return Ok(id);
        }

        let results = attempt.session.compute_results()?;
        let completed_at = self.clock.now_not_before(attempt.started_at);
        let summary = QuizSummary::from_results(&results, attempt.started_at, completed_at)?;
        let id = self.results.append_summary(&summary).await?;
        attempt.summary_id = Some(id);

        info!(
            summary_id = id,
            difficulty = %results.difficulty,
            score = results.score,
            total = results.total,
            accuracy = results.accuracy,
            completion = results.completion.as_str(),
            "quiz session archived"
        );
        Ok(id)
    }
}
