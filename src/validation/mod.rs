/*!
 * Validation of story lesson annotations against flashcard decks.
 *
 * # Architecture
 *
 * - `overrides`: Sanctioned `(word, lesson)` exceptions
 * - `lessons`: The per-span lesson rule and its findings
 * - `service`: Loads files, writes diagnostics, runs batch mode
 */

pub mod overrides;
pub mod lessons;
pub mod service;

// Re-export main types
pub use lessons::{LessonIssue, LessonValidator, OverrideNotice, SpanVerdict, StoryReport};
pub use overrides::{OverrideEntry, OverrideTable};
pub use service::{BatchSummary, ValidationService};
