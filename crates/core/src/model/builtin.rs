use super::{BankError, QuestionBank};

const BUILTIN_BANK_JSON: &str = include_str!("../../assets/builtin_bank.json");

impl QuestionBank {
    /// The bundled Python question bank, ten questions per tier.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` only if the bundled asset is corrupt.
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(BUILTIN_BANK_JSON)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Difficulty, QuestionBank};

    #[test]
    fn builtin_bank_has_ten_questions_per_tier() {
        let bank = QuestionBank::builtin().unwrap();
        for tier in Difficulty::ALL {
            assert_eq!(bank.partition(tier).len(), 10, "tier {tier}");
        }
    }

    #[test]
    fn builtin_questions_have_explanations() {
        let bank = QuestionBank::builtin().unwrap();
        for tier in Difficulty::ALL {
            assert!(
                bank.partition(tier)
                    .iter()
                    .all(|q| !q.explanation().is_empty())
            );
        }
    }
}
