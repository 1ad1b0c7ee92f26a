use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{CompletionReason, Difficulty, QuizResults};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("summary has no questions")]
    EmptyQuiz,

    #[error("score ({score}) plus skipped ({skipped}) exceeds total ({total})")]
    CountMismatch {
        score: u32,
        skipped: u32,
        total: u32,
    },

    #[error("too many questions for a single summary: {len}")]
    TooManyQuestions { len: usize },
}

/// Archived headline numbers of a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    difficulty: Difficulty,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: u32,
    total: u32,
    skipped: u32,
    elapsed_secs: u32,
    completion: CompletionReason,
}

impl QuizSummary {
    /// Rehydrate a summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError` when timestamps are inverted or counts do not add up.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        difficulty: Difficulty,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: u32,
        total: u32,
        skipped: u32,
        elapsed_secs: u32,
        completion: CompletionReason,
    ) -> Result<Self, QuizSummaryError> {
        if completed_at < started_at {
            return Err(QuizSummaryError::InvalidTimeRange);
        }
        if total == 0 {
            return Err(QuizSummaryError::EmptyQuiz);
        }
        if score.saturating_add(skipped) > total {
            return Err(QuizSummaryError::CountMismatch {
                score,
                skipped,
                total,
            });
        }

        Ok(Self {
            difficulty,
            started_at,
            completed_at,
            score,
            total,
            skipped,
            elapsed_secs,
            completion,
        })
    }

    /// Summarize exported results.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError` if the timestamps are inverted or the counts
    /// cannot be represented.
    pub fn from_results(
        results: &QuizResults,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizSummaryError> {
        let count = |len: usize| {
            u32::try_from(len).map_err(|_| QuizSummaryError::TooManyQuestions { len })
        };

        Self::from_persisted(
            results.difficulty,
            started_at,
            completed_at,
            count(results.score)?,
            count(results.total)?,
            count(results.skipped_count)?,
            results.elapsed_seconds,
            results.completion,
        )
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn completion(&self) -> CompletionReason {
        self.completion
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        QuizResults::accuracy_percent(self.score as usize, self.total as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PerformanceTier;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn results(score: usize, total: usize, skipped: usize) -> QuizResults {
        let accuracy = QuizResults::accuracy_percent(score, total);
        QuizResults {
            difficulty: Difficulty::Beginner,
            score,
            total,
            accuracy,
            skipped_count: skipped,
            elapsed_seconds: 42,
            completion: CompletionReason::Exhausted,
            performance: PerformanceTier::from_accuracy(accuracy),
            review: Vec::new(),
        }
    }

    #[test]
    fn summarizes_results() {
        let now = fixed_now();
        let summary =
            QuizSummary::from_results(&results(3, 4, 1), now, now + Duration::seconds(42))
                .unwrap();
        assert_eq!(summary.score(), 3);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.accuracy(), 75);
        assert_eq!(summary.elapsed_secs(), 42);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let now = fixed_now();
        let err = QuizSummary::from_results(&results(1, 1, 0), now, now - Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, QuizSummaryError::InvalidTimeRange);
    }

    #[test]
    fn rejects_counts_that_exceed_total() {
        let now = fixed_now();
        let err = QuizSummary::from_persisted(
            Difficulty::Advanced,
            now,
            now,
            3,
            3,
            1,
            0,
            CompletionReason::TimedOut,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizSummaryError::CountMismatch {
                score: 3,
                skipped: 1,
                total: 3
            }
        );
    }
}
