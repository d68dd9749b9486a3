//! CLI entry point for lsr

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use lsr::{DirWalker, Options, OutputConfig, StreamingFormatter, UsageError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for invalid command lines.
const USAGE_EXIT_CODE: i32 = 1;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lsr")]
#[command(about = "List a directory tree recursively, skipping symlink cycles")]
#[command(version)]
struct Args {
    /// Directory to list
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Show hidden entries (names starting with '.')
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Long format: permissions, links, owner, group, size, date
    #[arg(short = 'l', long = "long")]
    long: bool,

    /// Human-readable sizes (requires -l)
    #[arg(short = 'H', long = "human-readable")]
    human: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long = "follow")]
    follow: bool,

    /// Limit recursion depth (-1 = unlimited)
    #[arg(
        short = 'd',
        long = "depth",
        value_name = "DEPTH",
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    depth: i64,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

impl Args {
    fn options(&self) -> Result<Options, UsageError> {
        Options::from_cli(self.all, self.long, self.human, self.follow, self.depth)
    }
}

/// Install the stderr trace subscriber when `LSR_LOG` is set.
fn init_logging() {
    let Ok(filter) = EnvFilter::try_from_env("LSR_LOG") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(USAGE_EXIT_CODE),
            }
        }
    };

    let options = match args.options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("lsr: {}", e);
            eprintln!("{}", Args::command().render_usage());
            process::exit(USAGE_EXIT_CODE);
        }
    };

    init_logging();
    debug!(?options, path = %args.path.display(), "starting walk");

    let mut output = StreamingFormatter::new(OutputConfig {
        use_color: should_use_color(args.color),
    });
    let mut walker = DirWalker::new(options);

    match walker.walk(&args.path, &mut output) {
        Ok(stats) => {
            debug!(
                directories = stats.directories,
                entries = stats.entries,
                cycles = stats.cycles,
                errors = stats.errors,
                "walk finished"
            );
        }
        Err(e) => {
            eprintln!("lsr: error writing output: {}", e);
            process::exit(1);
        }
    }
}
