use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::{Difficulty, Question};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("no usable question partition for {requested} (fallback {fallback} is empty too)")]
    NoUsablePartition {
        requested: Difficulty,
        fallback: Difficulty,
    },

    #[error("invalid question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only catalogue of questions partitioned by difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    partitions: BTreeMap<Difficulty, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling a bank in code.
    #[must_use]
    pub fn with_partition(mut self, difficulty: Difficulty, questions: Vec<Question>) -> Self {
        self.partitions.insert(difficulty, questions);
        self
    }

    /// Parse a bank from JSON shaped as `{"beginner": [...], "intermediate": [...], ...}`.
    ///
    /// Every question is validated while parsing.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` on malformed JSON, unknown tiers or invalid questions.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Questions for one tier, in bank order. Empty when the tier is absent.
    #[must_use]
    pub fn partition(&self, difficulty: Difficulty) -> &[Question] {
        self.partitions
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pick the partition to draw from: the requested tier when it has questions,
    /// otherwise [`Difficulty::FALLBACK`].
    ///
    /// # Errors
    ///
    /// Returns `BankError::NoUsablePartition` when neither has a question.
    pub fn resolve(&self, requested: Difficulty) -> Result<(Difficulty, &[Question]), BankError> {
        let chosen = self.partition(requested);
        if !chosen.is_empty() {
            return Ok((requested, chosen));
        }

        let fallback = self.partition(Difficulty::FALLBACK);
        if !fallback.is_empty() {
            return Ok((Difficulty::FALLBACK, fallback));
        }

        Err(BankError::NoUsablePartition {
            requested,
            fallback: Difficulty::FALLBACK,
        })
    }

    /// Total questions across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question::new(text, vec!["a".into(), "b".into()], 0, "").unwrap()
    }

    #[test]
    fn resolve_prefers_requested_tier() {
        let bank = QuestionBank::new()
            .with_partition(Difficulty::Advanced, vec![question("adv")])
            .with_partition(Difficulty::Intermediate, vec![question("mid")]);

        let (tier, questions) = bank.resolve(Difficulty::Advanced).unwrap();
        assert_eq!(tier, Difficulty::Advanced);
        assert_eq!(questions[0].text(), "adv");
    }

    #[test]
    fn resolve_falls_back_to_intermediate_when_empty() {
        let bank = QuestionBank::new()
            .with_partition(Difficulty::Beginner, Vec::new())
            .with_partition(Difficulty::Intermediate, vec![question("mid")]);

        let (tier, questions) = bank.resolve(Difficulty::Beginner).unwrap();
        assert_eq!(tier, Difficulty::Intermediate);
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn resolve_fails_without_requested_or_fallback() {
        let bank = QuestionBank::new().with_partition(Difficulty::Advanced, vec![question("adv")]);
        let err = bank.resolve(Difficulty::Beginner).unwrap_err();
        assert!(matches!(
            err,
            BankError::NoUsablePartition {
                requested: Difficulty::Beginner,
                fallback: Difficulty::Intermediate
            }
        ));
    }

    #[test]
    fn parses_json_bank() {
        let raw = r#"{
            "beginner": [
                {"question": "Q1", "options": ["a", "b", "c"], "correct": 2, "explanation": "c"}
            ],
            "advanced": []
        }"#;
        let bank = QuestionBank::from_json(raw).unwrap();
        assert_eq!(bank.partition(Difficulty::Beginner).len(), 1);
        assert!(bank.partition(Difficulty::Advanced).is_empty());
        assert!(bank.partition(Difficulty::Intermediate).is_empty());
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn rejects_unknown_tier_and_invalid_questions() {
        assert!(QuestionBank::from_json(r#"{"expert": []}"#).is_err());
        let bad = r#"{"beginner": [{"question": "Q", "options": ["only"], "correct": 0}]}"#;
        assert!(matches!(
            QuestionBank::from_json(bad),
            Err(BankError::Parse(_))
        ));
    }
}
