use quiz_core::model::{Difficulty, QuizSummary};

use super::SqliteRepository;
use super::mapping::{map_summary_row, map_summary_row_with_id};
use crate::repository::{QuizResultRepository, QuizSummaryId, QuizSummaryRow, StorageError};

const SUMMARY_COLUMNS: &str = "
    id, difficulty, started_at, completed_at, score, total,
    skipped, elapsed_secs, completion
";

#[async_trait::async_trait]
impl QuizResultRepository for SqliteRepository {
    async fn append_summary(&self, summary: &QuizSummary) -> Result<QuizSummaryId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_summaries (
                    difficulty, started_at, completed_at, score, total,
                    skipped, elapsed_secs, completion
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(summary.difficulty().as_str())
        .bind(summary.started_at())
        .bind(summary.completed_at())
        .bind(i64::from(summary.score()))
        .bind(i64::from(summary.total()))
        .bind(i64::from(summary.skipped()))
        .bind(i64::from(summary.elapsed_secs()))
        .bind(summary.completion().as_str())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_summary(&self, id: QuizSummaryId) -> Result<QuizSummary, StorageError> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM quiz_summaries WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .ok_or(StorageError::NotFound)?;

        map_summary_row(&row)
    }

    async fn list_summaries(
        &self,
        difficulty: Option<Difficulty>,
        limit: u32,
    ) -> Result<Vec<QuizSummaryRow>, StorageError> {
        let mut sql = format!("SELECT {SUMMARY_COLUMNS} FROM quiz_summaries");
        if difficulty.is_some() {
            sql.push_str(" WHERE difficulty = ?1 ORDER BY completed_at DESC, id DESC LIMIT ?2");
        } else {
            sql.push_str(" ORDER BY completed_at DESC, id DESC LIMIT ?1");
        }

        let mut query = sqlx::query(&sql);
        if let Some(difficulty) = difficulty {
            query = query.bind(difficulty.as_str());
        }
        query = query.bind(i64::from(limit));

        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_summary_row_with_id(&row)?);
        }
        Ok(out)
    }
}
