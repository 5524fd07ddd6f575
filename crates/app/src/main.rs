use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use lesson_core::model::{Lesson, PlayerSettings};
use services::{
    Clock, InMemoryResourceFactory, LessonProgressionEngine, load_lesson_file, load_lesson_str,
};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Command, Player};

const BUILTIN_LESSON: &str = include_str!("../lessons/intro_to_programming.json");
const DEFAULT_MEDIA_DURATION: f64 = 120.0;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
    InvalidSkipSeconds { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --media-duration value: {raw}")
            }
            ArgsError::InvalidSkipSeconds { raw } => {
                write!(f, "invalid --skip-seconds value: {raw}")
            }
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p lesson-player -- [--lesson <file.json>] [--media-duration <secs>] [--skip-seconds <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --lesson         built-in \"Intro to Programming\" lesson");
    eprintln!("  --media-duration {DEFAULT_MEDIA_DURATION}");
    eprintln!("  --skip-seconds   10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LESSON_FILE, LESSON_MEDIA_DURATION, LESSON_SKIP_SECONDS, RUST_LOG");
    eprintln!();
    eprintln!("Commands (one per line on stdin):");
    eprintln!("  next | prev | play | pause | toggle | seek <secs> | seekpct <0-100>");
    eprintln!("  fwd | back | vol <0-1> | mute | tick [secs] | answer <question> <option>");
    eprintln!("  submit | status | quit");
}

struct Args {
    lesson: Option<PathBuf>,
    media_duration: f64,
    skip_seconds: Option<f64>,
}

fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut lesson = std::env::var("LESSON_FILE").ok().map(PathBuf::from);
        let mut media_duration = std::env::var("LESSON_MEDIA_DURATION")
            .ok()
            .and_then(|value| parse_seconds(&value))
            .unwrap_or(DEFAULT_MEDIA_DURATION);
        let mut skip_seconds = std::env::var("LESSON_SKIP_SECONDS")
            .ok()
            .and_then(|value| parse_seconds(&value));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lesson" => {
                    lesson = Some(PathBuf::from(require_value(args, "--lesson")?));
                }
                "--media-duration" => {
                    let value = require_value(args, "--media-duration")?;
                    media_duration = parse_seconds(&value)
                        .ok_or(ArgsError::InvalidDuration { raw: value })?;
                }
                "--skip-seconds" => {
                    let value = require_value(args, "--skip-seconds")?;
                    skip_seconds = Some(
                        parse_seconds(&value).ok_or(ArgsError::InvalidSkipSeconds { raw: value })?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            lesson,
            media_duration,
            skip_seconds,
        })
    }
}

fn load(args: &Args) -> Result<Lesson, Box<dyn std::error::Error>> {
    let lesson = match &args.lesson {
        Some(path) => load_lesson_file(path)?,
        None => load_lesson_str(BUILTIN_LESSON)?,
    };
    Ok(lesson)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = match args.skip_seconds {
        Some(seconds) => PlayerSettings::default().with_skip_seconds(seconds)?,
        None => PlayerSettings::default(),
    };
    let lesson = load(&args)?;
    tracing::info!(
        lesson = %lesson.id(),
        title = lesson.title(),
        steps = lesson.step_count(),
        media_duration = args.media_duration,
        "starting lesson"
    );

    let factory = InMemoryResourceFactory::new().with_auto_duration(args.media_duration);
    let engine = LessonProgressionEngine::new(lesson, factory, settings, Clock::default());
    let mut player = Player::new(engine);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", player.status())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match player.apply(command) {
            Ok(lines) => {
                for message in lines {
                    writeln!(out, "{message}")?;
                }
            }
            Err(err) => {
                tracing::debug!(?command, kind = ?err.kind(), "command rejected");
                writeln!(out, "error: {err}")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
