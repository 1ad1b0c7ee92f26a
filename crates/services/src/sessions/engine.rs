use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use quiz_core::Countdown;
use quiz_core::model::{
    Answer, CompletionReason, Difficulty, PerformanceTier, Question, QuestionBank, QuestionReview,
    QuizResults, QuizRules,
};

use crate::error::{SessionError, StateViolation};

use super::view::{QuestionView, SessionView};

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Feedback for a submitted answer, so the caller can render the reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub chosen: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub current_index: usize,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub time_remaining: u32,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt.
///
/// The question list is drawn once at start and never changes. All mutation goes
/// through the operations below; nothing advances implicitly.
#[derive(Debug, Clone)]
pub struct QuizSession {
    difficulty: Difficulty,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<Answer>>,
    score: usize,
    countdown: Countdown,
    status: SessionStatus,
    completion: Option<CompletionReason>,
    // A response was recorded at `current` since the last move.
    responded: bool,
}

impl QuizSession {
    /// Start a session with the default rules (10 questions, 300 seconds).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionBank` when neither the requested tier nor
    /// the fallback tier has questions.
    pub fn start<R: Rng + ?Sized>(
        difficulty: Difficulty,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        Self::start_with_rules(difficulty, bank, QuizRules::default(), rng)
    }

    /// Start a session: shuffle the resolved partition and keep the first
    /// `min(max_questions, partition size)` questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionBank` when neither the requested tier nor
    /// the fallback tier has questions.
    pub fn start_with_rules<R: Rng + ?Sized>(
        difficulty: Difficulty,
        bank: &QuestionBank,
        rules: QuizRules,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let (resolved, partition) = bank
            .resolve(difficulty)
            .map_err(|_| SessionError::EmptyQuestionBank)?;

        let mut questions = partition.to_vec();
        questions.shuffle(rng);
        questions.truncate(rules.max_questions.max(1));

        let answers = vec![None; questions.len()];
        Ok(Self {
            difficulty: resolved,
            questions,
            current: 0,
            answers,
            score: 0,
            countdown: Countdown::new(rules.time_budget_secs.max(1)),
            status: SessionStatus::Active,
            completion: None,
            responded: false,
        })
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<Answer>] {
        &self.answers
    }

    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<Answer> {
        self.answers.get(index).copied().flatten()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Slots holding a chosen option or a skip.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| matches!(a, Some(Answer::Skipped)))
            .count()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.countdown.elapsed()
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    #[must_use]
    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    /// True once the current question has a response and the caller has not moved yet.
    #[must_use]
    pub fn has_responded(&self) -> bool {
        self.responded
    }

    /// Record `option_index` for the current question.
    ///
    /// A question revisited via [`Self::go_to_previous`] may be answered again; the new
    /// answer replaces the old one and the score follows.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after completion or when the current question
    /// was already answered or skipped without moving, and
    /// `SessionError::OptionOutOfRange` for an index past the last option.
    pub fn submit_answer(&mut self, option_index: usize) -> Result<AnswerFeedback, SessionError> {
        let index = self.ensure_can_respond()?;
        let question = &self.questions[index];
        let len = question.options().len();
        if option_index >= len {
            return Err(SessionError::OptionOutOfRange {
                index: option_index,
                len,
            });
        }

        let feedback = AnswerFeedback {
            question_index: index,
            chosen: option_index,
            correct_index: question.correct_index(),
            is_correct: question.is_correct(option_index),
            explanation: question.explanation().to_owned(),
        };

        self.answers[index] = Some(Answer::Chosen(option_index));
        self.responded = true;
        self.recompute_score();
        Ok(feedback)
    }

    /// Mark the current question as skipped. Does not move.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after completion or when the current question
    /// already has a response since the last move.
    pub fn skip_current(&mut self) -> Result<usize, SessionError> {
        let index = self.ensure_can_respond()?;
        self.answers[index] = Some(Answer::Skipped);
        self.responded = true;
        self.recompute_score();
        Ok(index)
    }

    /// Step to the next question, completing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is already completed.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.ensure_active()?;
        self.current += 1;
        self.responded = false;
        if self.current >= self.questions.len() {
            self.current = self.questions.len();
            self.complete(CompletionReason::Exhausted);
        }

        Ok(AdvanceOutcome {
            current_index: self.current,
            is_complete: self.is_complete(),
        })
    }

    /// Step back one question, keeping any recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if completed or already at the first question.
    pub fn go_to_previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_active()?;
        if self.current == 0 {
            return Err(SessionError::InvalidState(StateViolation::AtFirstQuestion));
        }
        self.current -= 1;
        self.responded = false;
        Ok(self.current)
    }

    /// Consume one second of the budget; reaching zero completes the session where it is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is already completed.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_active()?;
        let time_remaining = self.countdown.tick();
        if self.countdown.is_expired() {
            self.complete(CompletionReason::TimedOut);
        }

        Ok(TickOutcome {
            time_remaining,
            is_complete: self.is_complete(),
        })
    }

    /// Project the completed session into exportable results.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` while the session is still active.
    pub fn compute_results(&self) -> Result<QuizResults, SessionError> {
        let Some(completion) = self.completion else {
            return Err(SessionError::InvalidState(StateViolation::SessionActive));
        };

        let review = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, answer)| QuestionReview {
                question_text: question.text().to_owned(),
                options: question.options().to_vec(),
                correct_index: question.correct_index(),
                user_answer: *answer,
                is_correct: answer
                    .and_then(Answer::chosen)
                    .is_some_and(|i| question.is_correct(i)),
                is_skipped: answer.is_some_and(Answer::is_skipped),
                explanation: question.explanation().to_owned(),
            })
            .collect();

        let total = self.total();
        let accuracy = QuizResults::accuracy_percent(self.score, total);
        Ok(QuizResults {
            difficulty: self.difficulty,
            score: self.score,
            total,
            accuracy,
            skipped_count: self.skipped_count(),
            elapsed_seconds: self.elapsed_secs(),
            completion,
            performance: PerformanceTier::from_accuracy(accuracy),
            review,
        })
    }

    /// Read model for presentation.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let total = self.total();
        let question = self.current_question().map(|q| QuestionView {
            index: self.current,
            text: q.text().to_owned(),
            options: q.options().to_vec(),
            recorded_answer: self.answer_at(self.current),
        });
        let progress_percent = if total == 0 {
            0
        } else {
            let shown = (self.current + 1).min(total);
            u32::try_from(shown * 100 / total).unwrap_or(100)
        };

        SessionView {
            difficulty: self.difficulty,
            status: self.status,
            completion: self.completion,
            question_number: (self.current + 1).min(total),
            total,
            progress_percent,
            question,
            score: self.score,
            answered: self.answered_count(),
            time_remaining: self.countdown.remaining(),
            time_display: self.countdown.display(),
            urgency: self.countdown.urgency(),
            can_go_previous: !self.is_complete() && self.current > 0,
            awaiting_advance: self.responded,
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::InvalidState(StateViolation::SessionCompleted));
        }
        Ok(())
    }

    fn ensure_can_respond(&self) -> Result<usize, SessionError> {
        self.ensure_active()?;
        if self.current >= self.questions.len() {
            return Err(SessionError::InvalidState(StateViolation::SessionCompleted));
        }
        if self.responded {
            return Err(SessionError::InvalidState(
                StateViolation::AlreadyResponded {
                    index: self.current,
                },
            ));
        }
        Ok(self.current)
    }

    fn recompute_score(&mut self) {
        self.score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.and_then(Answer::chosen).is_some_and(|i| q.is_correct(i)))
            .count();
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.status = SessionStatus::Completed;
        self.completion = Some(reason);
        self.responded = false;
    }
}
