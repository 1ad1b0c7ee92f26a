use quiz_core::model::{CompletionReason, Difficulty, QuizSummary};
use sqlx::Row;

use crate::repository::{QuizSummaryRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

pub(crate) fn parse_completion(s: &str) -> Result<CompletionReason, StorageError> {
    match s {
        "exhausted" => Ok(CompletionReason::Exhausted),
        "timed_out" => Ok(CompletionReason::TimedOut),
        _ => Err(StorageError::Serialization(format!(
            "invalid completion: {s}"
        ))),
    }
}

pub(crate) fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizSummary, StorageError> {
    let difficulty = parse_difficulty(&row.try_get::<String, _>("difficulty").map_err(ser)?)?;
    let completion = parse_completion(&row.try_get::<String, _>("completion").map_err(ser)?)?;
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let skipped = u32_from_i64("skipped", row.try_get::<i64, _>("skipped").map_err(ser)?)?;
    let elapsed_secs = u32_from_i64(
        "elapsed_secs",
        row.try_get::<i64, _>("elapsed_secs").map_err(ser)?,
    )?;

    QuizSummary::from_persisted(
        difficulty,
        started_at,
        completed_at,
        score,
        total,
        skipped,
        elapsed_secs,
        completion,
    )
    .map_err(ser)
}

pub(crate) fn map_summary_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<QuizSummaryRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(QuizSummaryRow::new(id, map_summary_row(row)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_enums() {
        assert_eq!(parse_difficulty("advanced").unwrap(), Difficulty::Advanced);
        assert_eq!(
            parse_completion("timed_out").unwrap(),
            CompletionReason::TimedOut
        );
        assert!(parse_completion("aborted").is_err());
        assert!(parse_difficulty("expert").is_err());
    }
}
