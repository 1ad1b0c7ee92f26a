use async_trait::async_trait;
use quiz_core::model::{Difficulty, QuizSummary};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage identifier for a persisted quiz summary (an `SQLite` row id).
pub type QuizSummaryId = i64;

/// A persisted summary together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummaryRow {
    pub id: QuizSummaryId,
    pub summary: QuizSummary,
}

impl QuizSummaryRow {
    #[must_use]
    pub fn new(id: QuizSummaryId, summary: QuizSummary) -> Self {
        Self { id, summary }
    }
}

/// Repository contract for completed quiz attempts.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Append a completed attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summary cannot be stored.
    async fn append_summary(&self, summary: &QuizSummary) -> Result<QuizSummaryId, StorageError>;

    /// Fetch a summary by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_summary(&self, id: QuizSummaryId) -> Result<QuizSummary, StorageError>;

    /// List summaries, newest completion first, optionally restricted to one tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_summaries(
        &self,
        difficulty: Option<Difficulty>,
        limit: u32,
    ) -> Result<Vec<QuizSummaryRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    summaries: Arc<Mutex<Vec<QuizSummaryRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryRepository {
    async fn append_summary(&self, summary: &QuizSummary) -> Result<QuizSummaryId, StorageError> {
        let mut guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = guard.last().map_or(1, |row| row.id + 1);
        guard.push(QuizSummaryRow::new(id, summary.clone()));
        Ok(id)
    }

    async fn get_summary(&self, id: QuizSummaryId) -> Result<QuizSummary, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.summary.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_summaries(
        &self,
        difficulty: Option<Difficulty>,
        limit: u32,
    ) -> Result<Vec<QuizSummaryRow>, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<QuizSummaryRow> = guard
            .iter()
            .filter(|row| difficulty.is_none_or(|d| row.summary.difficulty() == d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.summary
                .completed_at()
                .cmp(&a.summary.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quiz_results: Arc<dyn QuizResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let results: Arc<dyn QuizResultRepository> = Arc::new(InMemoryRepository::new());
        Self {
            quiz_results: results,
        }
    }
}
