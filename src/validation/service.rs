/*!
 * Validation service that drives story checks.
 *
 * This module loads decks and stories, runs the lesson rule over them and
 * writes the human-readable diagnostics. It also provides the batch mode
 * that walks every book under the stories root.
 */

use std::io::Write;
use std::path::Path;

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::deck::Deck;
use crate::errors::{AppError, ContentError};
use crate::file_utils::FileManager;
use crate::story::Story;

use super::lessons::{LessonValidator, StoryReport};
use super::overrides::OverrideTable;

/// Totals for a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Stories attempted, including ones that failed to load
    pub stories_checked: usize,
    pub stories_passed: usize,
    /// Stories with content issues or load errors
    pub stories_failed: usize,
    /// Stories or book directories that could not be read at all
    pub load_errors: usize,
    /// Books skipped because they have no deck
    pub books_skipped: usize,
}

impl BatchSummary {
    /// True when nothing failed; skipped books do not count
    pub fn all_passed(&self) -> bool {
        self.stories_failed == 0 && self.load_errors == 0
    }
}

/// Validation service orchestrating deck lookups and story checks
pub struct ValidationService {
    config: Config,
    overrides: OverrideTable,
}

impl ValidationService {
    /// Create a service using the config's override table
    pub fn new(config: Config) -> Self {
        let overrides = config.override_table();
        Self::with_overrides(config, overrides)
    }

    /// Create a service with an explicit override table
    pub fn with_overrides(config: Config, overrides: OverrideTable) -> Self {
        debug!("{} contextual overrides registered", overrides.len());
        Self { config, overrides }
    }

    /// Check one story against one deck.
    ///
    /// Override notices are written to `out` as they are found. The story
    /// then gets either an `OK:` line or a block listing every issue.
    pub fn validate_story<W: Write>(
        &self,
        story_path: &Path,
        deck_path: &Path,
        out: &mut W,
    ) -> Result<StoryReport, AppError> {
        let deck = Deck::load(deck_path)?;
        let story = Story::load(story_path)?;
        debug!("Checking {:?} against {:?}", story_path, deck_path);

        let validator = LessonValidator::new(&deck, &self.overrides);
        let mut notice_result = Ok(());
        let report = validator.check_story(&story, |notice| {
            if notice_result.is_ok() {
                notice_result = writeln!(out, "  {}", notice);
            }
        });
        notice_result?;

        if report.passed() {
            writeln!(out, "OK: {}", story_path.display())?;
        } else {
            writeln!(out)?;
            writeln!(out, "Issues found in {}:", story_path.display())?;
            for issue in &report.issues {
                writeln!(out, "  {}", issue)?;
            }
        }

        debug!(
            "{:?}: {} spans checked, {} issues, {} overrides",
            story_path,
            report.spans_checked,
            report.issues.len(),
            report.notices.len()
        );

        Ok(report)
    }

    /// Check one story against the deck of the book it belongs to
    pub fn validate_story_path<W: Write>(&self, story_path: &Path, out: &mut W) -> Result<StoryReport, AppError> {
        let deck_path = self.config.deck_path_for_story(story_path);
        self.validate_story(story_path, &deck_path, out)
    }

    /// Check every story of every book under the stories root.
    ///
    /// Books without a deck are skipped. A story that cannot be loaded is
    /// reported and counted as failed; the run continues with the next one.
    pub fn validate_all<W: Write>(&self, out: &mut W) -> Result<BatchSummary, AppError> {
        let stories_dir = self.config.stories_dir();
        if !FileManager::dir_exists(&stories_dir) {
            return Err(ContentError::NotFound { path: stories_dir }.into());
        }

        let mut summary = BatchSummary::default();

        for book_dir in FileManager::find_subdirs(&stories_dir)? {
            let Some(book) = book_dir.file_name().map(|name| name.to_string_lossy().into_owned()) else {
                continue;
            };

            let deck_path = self.config.deck_path_for_book(&book);
            if !FileManager::file_exists(&deck_path) {
                writeln!(out, "SKIP: No deck for {}", book)?;
                warn!("No deck at {:?}, skipping book {}", deck_path, book);
                summary.books_skipped += 1;
                continue;
            }

            let story_paths = match FileManager::find_files(&book_dir, &self.config.story_extension) {
                Ok(paths) => paths,
                Err(error) => {
                    writeln!(out, "ERROR: {}: {:#}", book_dir.display(), error)?;
                    warn!("Could not list stories of book {}: {:#}", book, error);
                    summary.load_errors += 1;
                    continue;
                }
            };

            for story_path in story_paths {
                summary.stories_checked += 1;

                match self.validate_story(&story_path, &deck_path, out) {
                    Ok(report) if report.passed() => summary.stories_passed += 1,
                    Ok(_) => summary.stories_failed += 1,
                    Err(AppError::Content(error)) => {
                        writeln!(out, "ERROR: {}: {}", story_path.display(), error)?;
                        warn!("Could not load {:?} while checking {:?}", error.path(), story_path);
                        summary.load_errors += 1;
                        summary.stories_failed += 1;
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        info!(
            "Checked {} stories: {} passed, {} failed ({} load errors), {} books skipped",
            summary.stories_checked,
            summary.stories_passed,
            summary.stories_failed,
            summary.load_errors,
            summary.books_skipped
        );

        Ok(summary)
    }
}
