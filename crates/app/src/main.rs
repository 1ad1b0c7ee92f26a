mod config;
mod history;
mod play;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use config::{Args, Command, prepare_sqlite_file, print_usage, resolve_difficulty};
use quiz_core::model::{Difficulty, QuizRules};
use services::{Clock, QuizRunner, QuizServices};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Stdout belongs to the quiz itself.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_logging(args.verbose);
    tracing::debug!(command = ?args.command, db = %args.db_url, "starting");
    let difficulty = resolve_difficulty(args.difficulty.as_deref());

    // Open + migrate SQLite at startup; services stay storage-agnostic.
    prepare_sqlite_file(&args.db_url)?;
    let services =
        QuizServices::new_sqlite(&args.db_url, Clock::default(), &args.bank, QuizRules::default())
            .await?;

    match args.command {
        Command::Play => {
            let rng = args
                .seed
                .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
            let quiz = QuizRunner::spawn(
                services.quiz().as_ref().clone(),
                rng,
                QuizRunner::DEFAULT_TICK_PERIOD,
            );
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            let difficulty = difficulty.unwrap_or(Difficulty::Beginner);

            if let Some(results) = play::play(&quiz, difficulty, &mut input).await? {
                play::print_results(&results);
                match quiz.summary_id().await? {
                    Some(id) => tracing::info!(summary_id = id, "attempt saved"),
                    None => tracing::warn!("attempt was not saved"),
                }
            }
            Ok(())
        }
        Command::History => {
            history::print_history(&services.history(), difficulty, args.limit).await
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
