use serde::{Deserialize, Serialize};

/// Headline band for a finished attempt, derived from accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Outstanding,
    Excellent,
    GoodJob,
    KeepStudying,
    PracticeMore,
}

impl PerformanceTier {
    /// Band for an accuracy percentage in `0..=100`.
    #[must_use]
    pub fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            90.. => Self::Outstanding,
            80..=89 => Self::Excellent,
            70..=79 => Self::GoodJob,
            60..=69 => Self::KeepStudying,
            _ => Self::PracticeMore,
        }
    }

    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding!",
            Self::Excellent => "Excellent!",
            Self::GoodJob => "Good job!",
            Self::KeepStudying => "Keep studying!",
            Self::PracticeMore => "Practice more!",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Outstanding => "🏆",
            Self::Excellent => "🎉",
            Self::GoodJob => "👍",
            Self::KeepStudying => "📚",
            Self::PracticeMore => "💪",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(PerformanceTier::from_accuracy(100), PerformanceTier::Outstanding);
        assert_eq!(PerformanceTier::from_accuracy(90), PerformanceTier::Outstanding);
        assert_eq!(PerformanceTier::from_accuracy(89), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_accuracy(70), PerformanceTier::GoodJob);
        assert_eq!(PerformanceTier::from_accuracy(60), PerformanceTier::KeepStudying);
        assert_eq!(PerformanceTier::from_accuracy(59), PerformanceTier::PracticeMore);
        assert_eq!(PerformanceTier::from_accuracy(0), PerformanceTier::PracticeMore);
    }
}
