//! Plain-text rendering of results for sharing.

use quiz_core::format_clock;
use quiz_core::model::QuizResults;

/// Share message for a finished attempt.
#[must_use]
pub fn share_text(results: &QuizResults) -> String {
    format!(
        "🐍 I just completed a Python quiz on PyHub!\n\n\
         📊 Results:\n\
         ✅ Score: {score}/{total} ({accuracy}%)\n\
         🎯 Difficulty: {difficulty}\n\n\
         #PyHub #Python #Quiz #Programming",
        score = results.score,
        total = results.total,
        accuracy = results.accuracy,
        difficulty = results.difficulty.label(),
    )
}

/// One-line recap used in logs and the terminal summary.
#[must_use]
pub fn recap_line(results: &QuizResults) -> String {
    format!(
        "{emoji} {headline} {score}/{total} ({accuracy}%) in {time}, {skipped} skipped",
        emoji = results.performance.emoji(),
        headline = results.performance.headline(),
        score = results.score,
        total = results.total,
        accuracy = results.accuracy,
        time = format_clock(results.elapsed_seconds),
        skipped = results.skipped_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CompletionReason, Difficulty, PerformanceTier};

    fn results() -> QuizResults {
        QuizResults {
            difficulty: Difficulty::Advanced,
            score: 8,
            total: 10,
            accuracy: 80,
            skipped_count: 1,
            elapsed_seconds: 125,
            completion: CompletionReason::Exhausted,
            performance: PerformanceTier::Excellent,
            review: Vec::new(),
        }
    }

    #[test]
    fn share_text_mentions_score_and_capitalized_difficulty() {
        let text = share_text(&results());
        assert!(text.contains("Score: 8/10 (80%)"));
        assert!(text.contains("Difficulty: Advanced"));
        assert!(text.ends_with("#Programming"));
    }

    #[test]
    fn recap_line_formats_time() {
        assert_eq!(
            recap_line(&results()),
            "🎉 Excellent! 8/10 (80%) in 2:05, 1 skipped"
        );
    }
}
