use quiz_core::format_clock;
use quiz_core::model::{CompletionReason, Difficulty};
use services::QuizHistoryService;

/// Print recent attempts and aggregate stats.
pub async fn print_history(
    history: &QuizHistoryService,
    difficulty: Option<Difficulty>,
    limit: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = history.list_recent(difficulty, limit).await?;
    if items.is_empty() {
        println!("No quizzes played yet.");
        return Ok(());
    }

    let scope = difficulty.map_or("all tiers", Difficulty::label);
    println!("Recent quizzes ({scope}):");
    for item in &items {
        let note = match item.completion {
            CompletionReason::Exhausted => "",
            CompletionReason::TimedOut => "  ⏰ timed out",
        };
        println!(
            "  #{:<4} {}  {:<12} {:>2}/{:<2} {:>3}%  {} skipped  {}{note}",
            item.id,
            item.completed_at.format("%Y-%m-%d %H:%M"),
            item.difficulty.label(),
            item.score,
            item.total,
            item.accuracy,
            item.skipped,
            format_clock(item.elapsed_secs),
        );
    }

    let stats = history.stats(difficulty, limit).await?;
    println!();
    println!(
        "{} attempts, best {}%, average {}%, {} timed out",
        stats.attempts, stats.best_accuracy, stats.average_accuracy, stats.timed_out
    );
    Ok(())
}
