use serde::Serialize;

use quiz_core::Urgency;
use quiz_core::model::{Answer, CompletionReason, Difficulty};

use super::engine::SessionStatus;

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub options: Vec<String>,
    /// Response already recorded for this slot, e.g. after going back.
    pub recorded_answer: Option<Answer>,
}

/// Presentation-facing snapshot of a session.
///
/// Everything a renderer needs, with no handle back into the engine. Mutation only
/// happens through the session operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    pub completion: Option<CompletionReason>,
    /// 1-based, capped at `total`.
    pub question_number: usize,
    pub total: usize,
    pub progress_percent: u32,
    pub question: Option<QuestionView>,
    pub score: usize,
    pub answered: usize,
    pub time_remaining: u32,
    pub time_display: String,
    pub urgency: Urgency,
    pub can_go_previous: bool,
    pub awaiting_advance: bool,
}

impl SessionView {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::model::{Question, QuestionBank};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;
    use crate::sessions::QuizSession;

    fn session() -> QuizSession {
        let questions = vec![
            Question::new("one", vec!["a".into(), "b".into()], 0, "").unwrap(),
            Question::new("two", vec!["a".into(), "b".into()], 1, "").unwrap(),
        ];
        let bank = QuestionBank::new().with_partition(Difficulty::Beginner, questions);
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn fresh_session_view() {
        let view = session().view();
        assert_eq!(view.question_number, 1);
        assert_eq!(view.total, 2);
        assert_eq!(view.progress_percent, 50);
        assert_eq!(view.time_display, "5:00");
        assert_eq!(view.urgency, Urgency::Calm);
        assert!(!view.can_go_previous);
        assert!(!view.awaiting_advance);
        assert!(view.question.is_some_and(|q| q.recorded_answer.is_none()));
    }

    #[test]
    fn completed_view_has_no_question() {
        let mut session = session();
        session.skip_current().unwrap();
        session.advance().unwrap();
        session.skip_current().unwrap();
        session.advance().unwrap();

        let view = session.view();
        assert!(view.is_complete());
        assert!(view.question.is_none());
        assert_eq!(view.question_number, 2);
        assert_eq!(view.completion, Some(CompletionReason::Exhausted));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(session().view()).unwrap();
        assert_eq!(value["questionNumber"], json!(1));
        assert_eq!(value["timeDisplay"], json!("5:00"));
        assert_eq!(value["awaitingAdvance"], json!(false));
        assert!(value["question"]["recordedAnswer"].is_null());
    }
}
