use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{CompletionReason, Difficulty};
use storage::repository::{InMemoryRepository, QuizResultRepository, QuizSummaryId, QuizSummaryRow};

use crate::error::QuizServiceError;

/// Presentation-agnostic list item for an archived attempt.
///
/// No pre-formatted strings; the caller decides how to render timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizHistoryItem {
    pub id: QuizSummaryId,
    pub difficulty: Difficulty,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub skipped: u32,
    pub accuracy: u32,
    pub elapsed_secs: u32,
    pub completion: CompletionReason,
}

impl QuizHistoryItem {
    #[must_use]
    pub fn from_row(row: &QuizSummaryRow) -> Self {
        let summary = &row.summary;
        Self {
            id: row.id,
            difficulty: summary.difficulty(),
            completed_at: summary.completed_at(),
            score: summary.score(),
            total: summary.total(),
            skipped: summary.skipped(),
            accuracy: summary.accuracy(),
            elapsed_secs: summary.elapsed_secs(),
            completion: summary.completion(),
        }
    }
}

/// Aggregates over a window of archived attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizStats {
    pub attempts: u32,
    pub best_accuracy: u32,
    pub average_accuracy: u32,
    pub timed_out: u32,
}

/// Read-only view over archived quiz attempts.
#[derive(Clone)]
pub struct QuizHistoryService {
    results: Arc<dyn QuizResultRepository>,
}

impl QuizHistoryService {
    #[must_use]
    pub fn new(results: Arc<dyn QuizResultRepository>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Most recent attempts first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` on repository failures.
    pub async fn list_recent(
        &self,
        difficulty: Option<Difficulty>,
        limit: u32,
    ) -> Result<Vec<QuizHistoryItem>, QuizServiceError> {
        let rows = self.results.list_summaries(difficulty, limit).await?;
        Ok(rows.iter().map(QuizHistoryItem::from_row).collect())
    }

    /// Stats over the latest `window` attempts.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` on repository failures.
    pub async fn stats(
        &self,
        difficulty: Option<Difficulty>,
        window: u32,
    ) -> Result<QuizStats, QuizServiceError> {
        let items = self.list_recent(difficulty, window).await?;
        Ok(summarize(&items))
    }
}

fn summarize(items: &[QuizHistoryItem]) -> QuizStats {
    if items.is_empty() {
        return QuizStats::default();
    }

    let attempts = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let sum: u64 = items.iter().map(|i| u64::from(i.accuracy)).sum();
    let count = items.len() as u64;
    QuizStats {
        attempts,
        best_accuracy: items.iter().map(|i| i.accuracy).max().unwrap_or(0),
        average_accuracy: u32::try_from((sum + count / 2) / count).unwrap_or(100),
        timed_out: u32::try_from(
            items
                .iter()
                .filter(|i| i.completion == CompletionReason::TimedOut)
                .count(),
        )
        .unwrap_or(u32::MAX),
    }
}
