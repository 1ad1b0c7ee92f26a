use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::model::Difficulty;
use services::BankSource;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidSeed { raw: String },
    InvalidLimit { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pyquiz [play]  [--difficulty <tier>] [--bank <file.json>] [--seed <n>] [--db <sqlite_url>]");
    eprintln!("  pyquiz history [--difficulty <tier>] [--limit <n>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Tiers: beginner, intermediate, advanced");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --difficulty beginner (play), all tiers (history)");
    eprintln!("  --limit {DEFAULT_HISTORY_LIMIT}");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --verbose     debug logging (RUST_LOG overrides)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_DIFFICULTY, QUIZ_BANK_PATH, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

/// Parsed command line. The tier stays raw until logging is up so a bad value
/// can be reported through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub db_url: String,
    pub difficulty: Option<String>,
    pub bank: BankSource,
    pub seed: Option<u64>,
    pub limit: u32,
    pub verbose: bool,
    pub help: bool,
}

impl Args {
    /// Parse `argv` (without the program name), with environment fallbacks.
    pub fn parse(
        argv: Vec<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut iter = argv.into_iter().peekable();
        // No subcommand means play.
        let command = match iter.peek().map(String::as_str) {
            Some(first) if !first.starts_with('-') => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?;
                iter.next();
                command
            }
            _ => Command::Play,
        };

        let mut args = Self {
            command,
            db_url: normalize_sqlite_url(
                env("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()),
            ),
            difficulty: env("QUIZ_DIFFICULTY"),
            bank: env("QUIZ_BANK_PATH").map_or(BankSource::Builtin, BankSource::File),
            seed: None,
            limit: DEFAULT_HISTORY_LIMIT,
            verbose: false,
            help: false,
        };

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut iter, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    args.db_url = normalize_sqlite_url(value);
                }
                "--difficulty" | "-d" => {
                    args.difficulty = Some(require_value(&mut iter, "--difficulty")?);
                }
                "--bank" => {
                    args.bank = BankSource::File(require_value(&mut iter, "--bank")?);
                }
                "--seed" => {
                    let value = require_value(&mut iter, "--seed")?;
                    let seed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    args.seed = Some(seed);
                }
                "--limit" => {
                    let value = require_value(&mut iter, "--limit")?;
                    args.limit = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidLimit { raw: value })?;
                }
                "--verbose" | "-v" => args.verbose = true,
                "--help" | "-h" => args.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(args)
    }
}

/// Resolve the requested tier; unknown names fall back with a warning.
pub fn resolve_difficulty(raw: Option<&str>) -> Option<Difficulty> {
    let raw = raw?;
    match raw.parse() {
        Ok(difficulty) => Some(difficulty),
        Err(err) => {
            let fallback = Difficulty::parse_lenient(raw);
            tracing::warn!(error = %err, using = %fallback, "unknown difficulty");
            Some(fallback)
        }
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_string();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    // SQLite URI filenames (`file:...`) are passed through untouched.
    if rest.starts_with("file:") {
        return trimmed.to_string();
    }

    let (path_str, query) = rest
        .split_once('?')
        .map_or((rest, None), |(path, query)| (path, Some(query)));
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

/// Make sure the database file and its directory exist before connecting.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
