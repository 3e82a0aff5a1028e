// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use deckcheck::app_config::{self, Config, CONFIG_FILE_NAME};
use deckcheck::errors::AppError;
use deckcheck::validation::ValidationService;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the lesson numbers of one story against its book's deck
    Validate {
        /// Story file, e.g. content/stories/hsk1/story1.json
        #[arg(value_name = "STORY")]
        story_path: Option<PathBuf>,
    },

    /// Check every story of every book under content/stories
    ValidateAll,

    /// Generate shell completions for deckcheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// deckcheck - lesson annotation checker
///
/// Confirms that every lesson number (`l`) assigned to a story word is
/// backed by an exact entry in the book's flashcard deck.
#[derive(Parser, Debug)]
#[command(name = "deckcheck")]
#[command(version)]
#[command(about = "Check story lesson annotations against flashcard decks")]
#[command(long_about = "deckcheck validates word-level lesson numbers in story JSON files.

RULES:
    A word may carry a lesson number (l) only if the EXACT word (same
    characters) exists in the book's flashcard deck and the number equals
    the deck's lesson. No compound inference, no component fallback.

    猫   in deck as L5 \"cat\"            -> l: 5 is valid
    小猫 not in deck                     -> no l allowed
    贵   in deck as L1, used as L10      -> l: 10 is a contextual override

EXAMPLES:
    deckcheck validate content/stories/hsk1/story1.json
    deckcheck validate-all
    deckcheck content/stories/hsk1/story1.json
    deckcheck --root ../reader validate-all
    deckcheck completions bash > deckcheck.bash

LAYOUT:
    Stories live in <root>/content/stories/<book>/*.json and decks in
    <root>/content/flashcards/<book>.json. An optional deckcheck.json in the
    root can change the default book, the story extension and add overrides.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Story file to validate (shorthand for `validate STORY`)
    #[arg(value_name = "PATH")]
    input_path: Option<PathBuf>,

    /// Project root containing the content directory
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file path [default: <root>/deckcheck.json]
    #[arg(short, long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            // Diagnostics own stdout; log lines always go to stderr
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // The logger accepts every level; the global max level does the filtering
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialise logger: {}", e);
    }
    log::set_max_level(LevelFilter::Warn);

    let cli = CommandLineOptions::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            debug!("Exiting after error: {:?}", e);
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CommandLineOptions) -> Result<ExitCode, AppError> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "deckcheck", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate { story_path }) => {
            let story_path = story_path
                .ok_or_else(|| AppError::Usage("deckcheck validate <story.json>".to_string()))?;
            let service = build_service(cli.root, cli.config_path, cli.log_level.is_some())?;
            run_validate(&service, &story_path)
        }
        Some(Commands::ValidateAll) => {
            let service = build_service(cli.root, cli.config_path, cli.log_level.is_some())?;
            run_validate_all(&service)
        }
        None => {
            let Some(input_path) = cli.input_path else {
                CommandLineOptions::command()
                    .print_help()
                    .map_err(AppError::Output)?;
                return Ok(ExitCode::SUCCESS);
            };

            if !input_path.exists() {
                println!("Not found: {}", input_path.display());
                return Ok(ExitCode::FAILURE);
            }

            let service = build_service(cli.root, cli.config_path, cli.log_level.is_some())?;
            run_validate(&service, &input_path)
        }
    }
}

/// Load configuration, apply CLI overrides and create the service
fn build_service(
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
    log_level_from_cli: bool,
) -> Result<ValidationService, AppError> {
    let config_path = config_path.unwrap_or_else(|| {
        root.clone()
            .unwrap_or_else(app_config::default_project_root)
            .join(CONFIG_FILE_NAME)
    });

    let mut config = Config::load_or_default(&config_path)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(root) = root {
        config.project_root = root;
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // If log level was not set via command line, use the config's
    if !log_level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }

    debug!("Using project root {:?}", config.project_root);
    Ok(ValidationService::new(config))
}

fn run_validate(service: &ValidationService, story_path: &Path) -> Result<ExitCode, AppError> {
    let mut stdout = std::io::stdout().lock();
    let report = service.validate_story_path(story_path, &mut stdout)?;

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_validate_all(service: &ValidationService) -> Result<ExitCode, AppError> {
    let mut stdout = std::io::stdout().lock();
    let summary = service.validate_all(&mut stdout)?;

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
