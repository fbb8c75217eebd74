use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use quiz_core::model::QuestionBank;
use services::{Clock, QuizService, SessionConfig, SessionError};
use storage::JsonPlayerStore;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--player <name>] [--category <name>]");
    eprintln!("                      [--count <n>] [--max-level <n>] [--seed <n>]");
    eprintln!("                      [--allow-repeats] [--random-levels]");
    eprintln!("                      [--data-dir <path>]");
    eprintln!("  cargo run -p app -- --list-categories");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --player guest  --category Farm  --count 5  --max-level 5");
    eprintln!("  --data-dir player_data");
}

struct Args {
    player: String,
    category: String,
    count: usize,
    max_level: u32,
    allow_repeats: bool,
    random_levels: bool,
    seed: Option<u64>,
    data_dir: String,
    list_categories: bool,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgsError> {
    let raw = require_value(args, flag)?;
    raw.parse().map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            player: "guest".into(),
            category: "Farm".into(),
            count: 5,
            max_level: 5,
            allow_repeats: false,
            random_levels: false,
            seed: None,
            data_dir: "player_data".into(),
            list_categories: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--player" => parsed.player = require_value(args, "--player")?,
                "--category" => parsed.category = require_value(args, "--category")?,
                "--count" => parsed.count = parse_number(args, "--count")?,
                "--max-level" => parsed.max_level = parse_number(args, "--max-level")?,
                "--seed" => parsed.seed = Some(parse_number(args, "--seed")?),
                "--allow-repeats" => parsed.allow_repeats = true,
                "--random-levels" => parsed.random_levels = true,
                "--data-dir" => parsed.data_dir = require_value(args, "--data-dir")?,
                "--list-categories" => parsed.list_categories = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn read_answer(input: &mut impl BufRead) -> std::io::Result<Option<bool>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        // Stdin closed: treat the rest of the session as abandoned.
        return Ok(None);
    }
    Ok(Some(matches!(
        line.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "t"
    )))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank = QuestionBank::builtin();
    if args.list_categories {
        for name in bank.category_names() {
            println!("{name}  ({} questions)", bank.category_len(name));
        }
        return Ok(());
    }

    let store = Arc::new(JsonPlayerStore::open(&args.data_dir)?);
    let service = QuizService::new(Clock::default_clock(), bank, store);

    match service.load_progress(&args.player, &args.category) {
        Ok(Some(prior)) => println!(
            "Welcome back, {}! Last run in {}: {}/{} correct, best streak {}.",
            args.player,
            prior.category,
            prior.correct_answers,
            prior.total_answered,
            prior.best_streak
        ),
        Ok(None) => println!("Welcome, {}!", args.player),
        // A broken store should not block play.
        Err(err) => eprintln!("could not load progress: {err}"),
    }

    let config = SessionConfig::new(
        args.count,
        args.max_level,
        !args.random_levels,
        args.allow_repeats,
    )?;
    let mut session = service.start_session(&args.category, config, args.seed)?;
    println!(
        "Category: {} — {} questions, difficulty up to level {}.\n",
        session.category(),
        config.count(),
        config.max_level()
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut round = 0;
    loop {
        let question = match session.next_question() {
            Ok(question) => question,
            Err(SessionError::Exhausted) => break,
            Err(SessionError::InsufficientQuestions { .. }) => {
                println!("The category ran out of fresh questions.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        round += 1;
        println!("[{round}] (level {}) {}", session.level(), question.text());
        print!("Did you answer correctly? [y/n] ");
        std::io::stdout().flush()?;

        let Some(correct) = read_answer(&mut input)? else {
            println!("\nSession abandoned.");
            break;
        };
        let level = session.submit_answer(question.text(), correct)?;
        if correct {
            println!("Nice — difficulty is now level {level}.\n");
        } else {
            println!("That one gets heavier — difficulty is now level {level}.\n");
        }
    }

    let summary = session.summary();
    println!(
        "Done: {}/{} correct ({:.1}%), best streak {}.",
        summary.correct, summary.answered, summary.accuracy_percent, summary.best_streak
    );

    match service.finish_session(&args.player, &session) {
        Ok(record) => println!("Progress saved for {} in {}.", args.player, record.category),
        // A failed save must not eat the session results.
        Err(err) => eprintln!("could not save progress: {err}"),
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
