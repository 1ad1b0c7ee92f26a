use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// Persisted/serialized shape of a question before validation.
///
/// Accepts both the short field names used by hand-written banks
/// (`question`, `correct`) and the canonical ones (`text`, `correct_index`).
#[derive(Debug, Clone, Deserialize)]
struct QuestionRecord {
    #[serde(alias = "question")]
    text: String,
    options: Vec<String>,
    #[serde(alias = "correct", alias = "correctIndex")]
    correct_index: usize,
    #[serde(default)]
    explanation: String,
}

/// A single multiple-choice question. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is blank, fewer than two options are
    /// given, or `correct_index` does not point at an option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            text,
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    /// Letter label for an option, `A` for index 0.
    #[must_use]
    pub fn option_label(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .and_then(|i| b'A'.checked_add(i))
            .filter(u8::is_ascii_uppercase)
            .map_or('?', char::from)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.text,
            record.options,
            record.correct_index,
            record.explanation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new("Q", opts(1), 0, "").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new("Q", opts(2), 2, "").unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn rejects_blank_text() {
        assert_eq!(
            Question::new("   ", opts(2), 0, "").unwrap_err(),
            QuestionError::EmptyText
        );
    }

    #[test]
    fn deserializes_short_field_names() {
        let json = r#"{
            "question": "Python is case-sensitive. True or False?",
            "options": ["True", "False"],
            "correct": 0,
            "explanation": "It is."
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_index(), 0);
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"text": "Q", "options": ["a", "b"], "correct_index": 5}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn option_labels() {
        assert_eq!(Question::option_label(0), 'A');
        assert_eq!(Question::option_label(3), 'D');
        assert_eq!(Question::option_label(26), '?');
    }
}
