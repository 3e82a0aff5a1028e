/*!
 * # deckcheck - lesson annotation checker for graded readers
 *
 * Stories for the reader are split into sentences whose words are
 * annotated with character spans. A span may carry the number of the
 * lesson that introduces the word. This library confirms that every such
 * number is backed by an exact, verbatim entry in the book's flashcard
 * deck.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration and the content directory layout
 * - `deck`: Flashcard deck loading
 * - `story`: Story document model and span extraction
 * - `validation`: The lesson rule, overrides and the batch driver
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod deck;
pub mod errors;
pub mod file_utils;
pub mod story;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use deck::{Deck, DeckEntry};
pub use errors::{AppError, ContentError};
pub use story::{Sentence, Story, WordSpan};
pub use validation::{BatchSummary, OverrideTable, StoryReport, ValidationService};
