/// Sizing and timing knobs for a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRules {
    pub max_questions: usize,
    pub time_budget_secs: u32,
}

impl QuizRules {
    pub const DEFAULT_MAX_QUESTIONS: usize = 10;
    pub const DEFAULT_TIME_BUDGET_SECS: u32 = 300;
}

impl Default for QuizRules {
    fn default() -> Self {
        Self {
            max_questions: Self::DEFAULT_MAX_QUESTIONS,
            time_budget_secs: Self::DEFAULT_TIME_BUDGET_SECS,
        }
    }
}
