use std::collections::HashSet;

use proptest::prelude::*;
use quiz_core::model::{Answer, CompletionReason, Difficulty, Question, QuestionBank};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{QuizSession, SessionError, SessionStatus, StateViolation};

fn numbered_bank(tier: Difficulty, count: usize) -> QuestionBank {
    let questions = (0..count)
        .map(|i| {
            Question::new(
                format!("question {i}"),
                vec!["w".into(), "x".into(), "y".into(), "z".into()],
                i % 4,
                format!("explanation {i}"),
            )
            .unwrap()
        })
        .collect();
    QuestionBank::new().with_partition(tier, questions)
}

fn question_number(q: &Question) -> usize {
    q.text()
        .strip_prefix("question ")
        .and_then(|n| n.parse().ok())
        .unwrap()
}

#[test]
fn ten_beginner_questions_are_a_permutation() {
    let bank = numbered_bank(Difficulty::Beginner, 10);
    let session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(1)).unwrap();

    let mut seen: Vec<usize> = session.questions().iter().map(question_number).collect();
    assert_eq!(seen.len(), 10);
    seen.sort_unstable();
    assert_eq!(seen, (0..10).collect::<Vec<_>>());
}

#[test]
fn same_seed_gives_same_order() {
    let bank = numbered_bank(Difficulty::Advanced, 30);
    let order = |seed| {
        QuizSession::start(Difficulty::Advanced, &bank, &mut StdRng::seed_from_u64(seed))
            .unwrap()
            .questions()
            .iter()
            .map(question_number)
            .collect::<Vec<_>>()
    };

    assert_eq!(order(42), order(42));
    assert_ne!(order(42), order(43));
}

#[test]
fn all_correct_in_five_question_session() {
    let bank = numbered_bank(Difficulty::Intermediate, 5);
    let mut session =
        QuizSession::start(Difficulty::Intermediate, &bank, &mut StdRng::seed_from_u64(3))
            .unwrap();
    assert_eq!(session.total(), 5);

    while let Some(question) = session.current_question() {
        let correct = question.correct_index();
        assert!(session.submit_answer(correct).unwrap().is_correct);
        session.advance().unwrap();
    }

    let results = session.compute_results().unwrap();
    assert_eq!(results.score, 5);
    assert_eq!(results.total, 5);
    assert_eq!(results.accuracy, 100);
    assert_eq!(results.completion, CompletionReason::Exhausted);
    assert!(results.review.iter().all(|r| r.is_correct));
}

#[test]
fn skipping_everything_scores_zero() {
    let bank = numbered_bank(Difficulty::Beginner, 7);
    let mut session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(9)).unwrap();

    while !session.is_complete() {
        session.skip_current().unwrap();
        session.advance().unwrap();
    }

    let results = session.compute_results().unwrap();
    assert_eq!(results.score, 0);
    assert_eq!(results.skipped_count, results.total);
    assert!(results.review.iter().all(|r| r.is_skipped));
    assert!(
        results
            .review
            .iter()
            .all(|r| r.user_answer == Some(Answer::Skipped))
    );
}

#[test]
fn three_hundred_ticks_time_out_in_place() {
    let bank = numbered_bank(Difficulty::Beginner, 10);
    let mut session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(5)).unwrap();
    session.advance().unwrap();
    session.advance().unwrap();

    for n in 1..=300 {
        let outcome = session.tick().unwrap();
        assert_eq!(outcome.is_complete, n == 300);
    }

    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.time_remaining(), 0);

    let results = session.compute_results().unwrap();
    assert_eq!(results.completion, CompletionReason::TimedOut);
    assert_eq!(results.elapsed_seconds, 300);
}

#[test]
fn submitting_after_completion_is_invalid() {
    let bank = numbered_bank(Difficulty::Beginner, 1);
    let mut session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(0)).unwrap();
    session.advance().unwrap();

    assert_eq!(
        session.submit_answer(0).unwrap_err(),
        SessionError::InvalidState(StateViolation::SessionCompleted)
    );
    assert_eq!(
        session.skip_current().unwrap_err(),
        SessionError::InvalidState(StateViolation::SessionCompleted)
    );
    assert_eq!(
        session.go_to_previous().unwrap_err(),
        SessionError::InvalidState(StateViolation::SessionCompleted)
    );
}

#[test]
fn results_are_idempotent() {
    let bank = numbered_bank(Difficulty::Beginner, 4);
    let mut session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(11)).unwrap();
    session.submit_answer(1).unwrap();
    session.advance().unwrap();
    session.skip_current().unwrap();
    for _ in 0..300 {
        if session.tick().unwrap().is_complete {
            break;
        }
    }

    assert_eq!(
        session.compute_results().unwrap(),
        session.compute_results().unwrap()
    );
}

#[test]
fn going_back_keeps_score_ahead_of_the_cursor() {
    let bank = numbered_bank(Difficulty::Beginner, 5);
    let mut session =
        QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(17)).unwrap();
    for _ in 0..3 {
        let correct = session.current_question().unwrap().correct_index();
        session.submit_answer(correct).unwrap();
        session.advance().unwrap();
    }
    assert_eq!((session.current_index(), session.score()), (3, 3));

    session.go_to_previous().unwrap();
    session.go_to_previous().unwrap();
    session.advance().unwrap();

    assert_eq!(session.current_index(), 2);
    assert_eq!(session.score(), 3);
    assert!(session.score() <= session.answered_count());

    while !session.is_complete() {
        session.advance().unwrap();
    }
    assert!(session.score() <= session.current_index());
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Submit(usize),
    Skip,
    Advance,
    Previous,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::Submit),
        Just(Op::Skip),
        Just(Op::Advance),
        Just(Op::Previous),
    ]
}

proptest! {
    #[test]
    fn start_samples_without_duplicates(size in 1usize..40, seed in any::<u64>()) {
        let bank = numbered_bank(Difficulty::Advanced, size);
        let session =
            QuizSession::start(Difficulty::Advanced, &bank, &mut StdRng::seed_from_u64(seed))
                .unwrap();

        prop_assert_eq!(session.total(), size.min(10));
        let unique: HashSet<usize> = session.questions().iter().map(question_number).collect();
        prop_assert_eq!(unique.len(), session.total());
        prop_assert!(unique.iter().all(|n| *n < size));
    }

    #[test]
    fn score_never_outruns_progress(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..60)) {
        let bank = numbered_bank(Difficulty::Beginner, 10);
        let mut session =
            QuizSession::start(Difficulty::Beginner, &bank, &mut StdRng::seed_from_u64(seed))
                .unwrap();

        let mut went_back = false;
        for op in ops {
            let before = session.clone();
            let outcome = match op {
                Op::Submit(i) => session.submit_answer(i).map(|_| ()),
                Op::Skip => session.skip_current().map(|_| ()),
                Op::Advance => session.advance().map(|_| ()),
                Op::Previous => session.go_to_previous().map(|_| ()),
            };

            if outcome.is_err() {
                // Rejected operations leave the session untouched.
                prop_assert_eq!(session.answers(), before.answers());
                prop_assert_eq!(session.current_index(), before.current_index());
                prop_assert_eq!(session.score(), before.score());
            } else if matches!(op, Op::Previous) {
                went_back = true;
            }

            let matching = session
                .questions()
                .iter()
                .zip(session.answers())
                .filter(|(q, a)| **a == Some(Answer::Chosen(q.correct_index())))
                .count();
            prop_assert_eq!(session.score(), matching);
            prop_assert!(session.score() <= session.answered_count());
            // Answers kept behind the cursor still count after going back.
            if session.is_complete() || (matches!(op, Op::Advance) && !went_back) {
                prop_assert!(session.score() <= session.current_index());
            }
            prop_assert!(session.current_index() <= session.total());
        }
    }
}
