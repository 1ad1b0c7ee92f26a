use serde::{Deserialize, Serialize};

use super::{Answer, Difficulty, PerformanceTier};

/// Why an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Every question was stepped past.
    Exhausted,
    /// The countdown reached zero first.
    TimedOut,
}

impl CompletionReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionReason::Exhausted => "exhausted",
            CompletionReason::TimedOut => "timed_out",
        }
    }
}

/// Review entry for one question of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub user_answer: Option<Answer>,
    pub is_correct: bool,
    pub is_skipped: bool,
    pub explanation: String,
}

/// Exportable outcome of a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
    /// Whole percent, rounded half up.
    pub accuracy: u32,
    pub skipped_count: usize,
    pub elapsed_seconds: u32,
    pub completion: CompletionReason,
    pub performance: PerformanceTier,
    pub review: Vec<QuestionReview>,
}

impl QuizResults {
    /// `round(100 * score / total)`; zero when `total` is zero.
    #[must_use]
    pub fn accuracy_percent(score: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        let score = score.min(total) as u64;
        let total = total as u64;
        let rounded = (200 * score + total) / (2 * total);
        u32::try_from(rounded).unwrap_or(100)
    }

    /// Number of questions answered incorrectly (skips excluded).
    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.review
            .iter()
            .filter(|r| !r.is_correct && !r.is_skipped && r.user_answer.is_some())
            .count()
    }

    /// Number of questions left without any response.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.review.iter().filter(|r| r.user_answer.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(QuizResults::accuracy_percent(5, 5), 100);
        assert_eq!(QuizResults::accuracy_percent(0, 5), 0);
        assert_eq!(QuizResults::accuracy_percent(1, 3), 33);
        assert_eq!(QuizResults::accuracy_percent(2, 3), 67);
        assert_eq!(QuizResults::accuracy_percent(1, 8), 13);
        assert_eq!(QuizResults::accuracy_percent(0, 0), 0);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let review = QuestionReview {
            question_text: "Q".into(),
            options: vec!["a".into(), "b".into()],
            correct_index: 1,
            user_answer: Some(Answer::Skipped),
            is_correct: false,
            is_skipped: true,
            explanation: "because".into(),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["questionText"], "Q");
        assert_eq!(value["correctIndex"], 1);
        assert_eq!(value["isSkipped"], true);
        assert_eq!(value["userAnswer"]["kind"], "skipped");
    }
}
