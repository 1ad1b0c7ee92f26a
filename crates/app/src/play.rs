//! Interactive terminal quiz on top of a [`QuizHandle`].

use std::io::Write;

use quiz_core::Urgency;
use quiz_core::model::{Answer, Difficulty, Question, QuizResults};
use services::{
    QuizHandle, QuizServiceError, SessionError, SessionView, StateViolation, recap_line,
    share_text,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Choose(usize),
    Skip,
    Previous,
    Quit,
}

fn parse_action(line: &str, options: usize) -> Option<Action> {
    let line = line.trim().to_ascii_lowercase();
    let mut chars = line.chars();
    let (Some(first), None) = (chars.next(), chars.next()) else {
        return match line.as_str() {
            "skip" => Some(Action::Skip),
            "prev" | "back" => Some(Action::Previous),
            "quit" | "exit" => Some(Action::Quit),
            _ => line
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=options).contains(n))
                .map(|n| Action::Choose(n - 1)),
        };
    };

    // Command letters win over option letters; those options stay reachable by number.
    match first {
        's' => return Some(Action::Skip),
        'p' => return Some(Action::Previous),
        'q' => return Some(Action::Quit),
        _ => {}
    }
    if let Some(digit) = first.to_digit(10) {
        let n = digit as usize;
        return (1..=options).contains(&n).then(|| Action::Choose(n - 1));
    }
    if first.is_ascii_lowercase() {
        let index = (first as u8 - b'a') as usize;
        return (index < options).then_some(Action::Choose(index));
    }
    None
}

fn label(index: usize) -> char {
    Question::option_label(index)
}

fn render_question(view: &SessionView) {
    let Some(question) = &view.question else {
        return;
    };
    println!();
    println!(
        "Question {}/{} ({}%)  ⏱ {}{}",
        view.question_number,
        view.total,
        view.progress_percent,
        view.time_display,
        match view.urgency {
            Urgency::Calm => "",
            Urgency::Warning => "  ⚠ hurry up",
            Urgency::Critical => "  🔥 almost out of time",
        }
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", label(i));
    }
    match question.recorded_answer {
        Some(Answer::Chosen(i)) => println!("  (previous answer: {})", label(i)),
        Some(Answer::Skipped) => println!("  (previously skipped)"),
        None => {}
    }
}

fn prompt(view: &SessionView) {
    let options = view.question.as_ref().map_or(0, |q| q.options.len());
    let last = label(options.saturating_sub(1));
    let back = if view.can_go_previous { ", p = back" } else { "" };
    print!("[A-{last}] answer, s = skip{back}, q = quit > ");
    let _ = std::io::stdout().flush();
}

fn completed(err: &QuizServiceError) -> bool {
    matches!(
        err,
        QuizServiceError::Session(SessionError::InvalidState(StateViolation::SessionCompleted))
    )
}

/// Apply one action. `Ok(false)` means the session finished underneath us.
async fn apply(quiz: &QuizHandle, action: Action) -> Result<bool, QuizServiceError> {
    let result = match action {
        Action::Choose(option) => match quiz.submit_answer(option).await {
            Ok(feedback) => {
                if feedback.is_correct {
                    println!("✅ Correct!");
                } else {
                    println!(
                        "❌ Incorrect. The answer was {}.",
                        label(feedback.correct_index)
                    );
                }
                if !feedback.explanation.is_empty() {
                    println!("   {}", feedback.explanation);
                }
                quiz.advance().await.map(|_| ())
            }
            Err(err) => Err(err),
        },
        Action::Skip => match quiz.skip_current().await {
            Ok(_) => quiz.advance().await.map(|_| ()),
            Err(err) => Err(err),
        },
        Action::Previous => quiz.go_to_previous().await.map(|_| ()),
        Action::Quit => Ok(()),
    };

    match result {
        Ok(()) => Ok(true),
        Err(err) if completed(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Run one quiz in the terminal. Returns `None` if the player quit early.
pub async fn play(
    quiz: &QuizHandle,
    difficulty: Difficulty,
    input: &mut Input,
) -> Result<Option<QuizResults>, Box<dyn std::error::Error>> {
    let mut views = quiz.subscribe();
    let first = quiz.start(difficulty).await?;
    if first.difficulty != difficulty {
        println!(
            "No {} questions available, playing {} instead.",
            difficulty.label(),
            first.difficulty.label()
        );
    }
    println!(
        "🐍 {} Python quiz: {} questions, {} on the clock.",
        first.difficulty.label(),
        first.total,
        first.time_display
    );

    loop {
        let Some(view) = quiz.snapshot() else {
            break;
        };
        if view.is_complete() {
            break;
        }
        render_question(&view);
        prompt(&view);

        let options = view.question.as_ref().map_or(0, |q| q.options.len());
        let line = tokio::select! {
            line = input.next_line() => line?,
            done = views.wait_for(|v| v.as_ref().is_some_and(SessionView::is_complete)) => {
                drop(done?);
                println!();
                println!("⏰ Time's up! Press Enter to see your results.");
                input.next_line().await?;
                break;
            }
        };

        let Some(line) = line else {
            println!();
            return Ok(None);
        };
        let Some(action) = parse_action(&line, options) else {
            println!("Please pick one of the listed options.");
            continue;
        };
        if action == Action::Quit {
            println!("Quiz abandoned.");
            return Ok(None);
        }
        if !apply(quiz, action).await? {
            break;
        }
    }

    Ok(Some(quiz.results().await?))
}

pub fn print_results(results: &QuizResults) {
    println!();
    println!("{}", recap_line(results));
    println!(
        "Correct: {}  Incorrect: {}  Skipped: {}  Unanswered: {}",
        results.score,
        results.incorrect_count(),
        results.skipped_count,
        results.unanswered_count()
    );
    println!("{}", results.performance.headline());

    println!();
    println!("Review:");
    for (i, review) in results.review.iter().enumerate() {
        let mark = if review.is_correct {
            "✅"
        } else if review.is_skipped {
            "⏭"
        } else {
            "❌"
        };
        println!("{mark} {}. {}", i + 1, review.question_text);
        let yours = match review.user_answer {
            Some(Answer::Chosen(choice)) => review
                .options
                .get(choice)
                .map_or_else(String::new, |o| format!("{}) {o}", label(choice))),
            Some(Answer::Skipped) => "skipped".to_string(),
            None => "not answered".to_string(),
        };
        let correct = review
            .options
            .get(review.correct_index)
            .map_or_else(String::new, |o| format!("{}) {o}", label(review.correct_index)));
        println!("   your answer: {yours}");
        if !review.is_correct {
            println!("   correct: {correct}");
        }
        if !review.explanation.is_empty() {
            println!("   {}", review.explanation);
        }
    }

    println!();
    println!("Share:");
    println!("{}", share_text(results));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_numbers_pick_options() {
        assert_eq!(parse_action("a", 4), Some(Action::Choose(0)));
        assert_eq!(parse_action(" D ", 4), Some(Action::Choose(3)));
        assert_eq!(parse_action("2", 4), Some(Action::Choose(1)));
        assert_eq!(parse_action("e", 4), None);
        assert_eq!(parse_action("0", 4), None);
    }

    #[test]
    fn commands() {
        assert_eq!(parse_action("s", 4), Some(Action::Skip));
        assert_eq!(parse_action("skip", 4), Some(Action::Skip));
        assert_eq!(parse_action("p", 4), Some(Action::Previous));
        assert_eq!(parse_action("quit", 4), Some(Action::Quit));
        assert_eq!(parse_action("", 4), None);
    }

    #[test]
    fn command_letters_win_with_many_options() {
        assert_eq!(parse_action("p", 20), Some(Action::Previous));
        assert_eq!(parse_action("q", 20), Some(Action::Quit));
        assert_eq!(parse_action("s", 20), Some(Action::Skip));
        assert_eq!(parse_action("o", 20), Some(Action::Choose(14)));
        assert_eq!(parse_action("16", 20), Some(Action::Choose(15)));
    }
}
