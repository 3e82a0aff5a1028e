use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::validation::overrides::{OverrideEntry, OverrideTable};

// Application configuration module
// This module handles loading and validating the configuration and knows
// where stories and decks live inside a project.

/// Name of the optional configuration file in the project root
pub const CONFIG_FILE_NAME: &str = "deckcheck.json";

/// Directory holding stories and decks, relative to the project root
pub const CONTENT_DIR: &str = "content";

/// Path segment after which a story path names its book
pub const STORIES_SEGMENT: &str = "stories";

/// Directory holding one deck file per book, inside the content directory
pub const FLASHCARDS_DIR: &str = "flashcards";

/// Deck file extension
pub const DECK_EXTENSION: &str = "json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root of the project; stories and decks live under `content/`
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Book used when a story path has no `stories/<book>` segment
    #[serde(default = "default_book")]
    pub default_book: String,

    /// Extension of story files picked up in batch mode
    #[serde(default = "default_story_extension")]
    pub story_extension: String,

    /// Contextual overrides added to the built-in table
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log crate
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Root used when neither `--root` nor the config file names one.
///
/// A binary installed one level below the project (`<project>/bin/deckcheck`)
/// finds its content next to that level. Anywhere else the current directory
/// is the root.
pub fn default_project_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| project_root_for_exe(&exe))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parent of the executable's directory, if it holds a content directory
pub fn project_root_for_exe(exe: &Path) -> Option<PathBuf> {
    let root = exe.parent()?.parent()?;
    root.join(CONTENT_DIR).is_dir().then(|| root.to_path_buf())
}

fn default_book() -> String {
    "hsk1".to_string()
}

fn default_story_extension() -> String {
    "json".to_string()
}

impl Config {
    /// Load the configuration file, or defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_book.trim().is_empty() {
            return Err(anyhow!("default_book must not be empty"));
        }

        if self.story_extension.trim().is_empty() {
            return Err(anyhow!("story_extension must not be empty"));
        }

        if let Some(entry) = self.overrides.iter().find(|o| o.word.is_empty()) {
            return Err(anyhow!("Override for lesson {} has an empty word", entry.lesson));
        }

        Ok(())
    }

    /// Built-in overrides plus the ones from this config
    pub fn override_table(&self) -> OverrideTable {
        OverrideTable::builtin().with_entries(self.overrides.iter().cloned())
    }

    pub fn stories_dir(&self) -> PathBuf {
        self.project_root.join(CONTENT_DIR).join(STORIES_SEGMENT)
    }

    pub fn flashcards_dir(&self) -> PathBuf {
        self.project_root.join(CONTENT_DIR).join(FLASHCARDS_DIR)
    }

    /// `content/flashcards/<book>.json`
    pub fn deck_path_for_book(&self, book: &str) -> PathBuf {
        self.flashcards_dir().join(format!("{}.{}", book, DECK_EXTENSION))
    }

    /// Book id of a story: the path segment following `stories`, or the
    /// default book when there is none.
    pub fn book_for_story<P: AsRef<Path>>(&self, story_path: P) -> String {
        let mut components = story_path.as_ref().components();

        while let Some(component) = components.next() {
            if component == Component::Normal(OsStr::new(STORIES_SEGMENT)) {
                if let Some(book) = components.next() {
                    return book.as_os_str().to_string_lossy().into_owned();
                }
                break;
            }
        }

        self.default_book.clone()
    }

    /// Deck that a story's lesson numbers are checked against
    pub fn deck_path_for_story<P: AsRef<Path>>(&self, story_path: P) -> PathBuf {
        self.deck_path_for_book(&self.book_for_story(story_path))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            project_root: default_project_root(),
            default_book: default_book(),
            story_extension: default_story_extension(),
            overrides: Vec::new(),
            log_level: LogLevel::default(),
        }
    }
}
