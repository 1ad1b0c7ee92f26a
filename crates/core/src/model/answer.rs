use serde::{Deserialize, Serialize};

/// A recorded response to one question slot.
///
/// An unanswered slot is represented by the absence of an `Answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "option")]
pub enum Answer {
    Chosen(usize),
    Skipped,
}

impl Answer {
    #[must_use]
    pub fn chosen(self) -> Option<usize> {
        match self {
            Answer::Chosen(index) => Some(index),
            Answer::Skipped => None,
        }
    }

    #[must_use]
    pub fn is_skipped(self) -> bool {
        matches!(self, Answer::Skipped)
    }
}
