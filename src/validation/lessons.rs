/*!
 * Lesson annotation rule.
 *
 * A span may carry a lesson number only when its exact characters are a
 * deck key and the lesson equals the deck's lesson for that key. Spans
 * without a lesson are never checked. A registered override turns a
 * mismatch into an informational notice that does not fail the story.
 */

use std::fmt;

use log::trace;

use crate::deck::Deck;
use crate::story::{Sentence, Story, WordSpan};

use super::overrides::OverrideTable;

/// Content finding that fails a story
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonIssue {
    /// The word is in the deck under a different lesson
    Mismatch {
        sentence_id: String,
        word: String,
        assigned: Option<i64>,
        deck_lesson: Option<i64>,
    },

    /// The word carries a lesson but has no exact deck entry
    NotInDeck {
        sentence_id: String,
        word: String,
        assigned: Option<i64>,
    },

    /// The span does not select any characters of the sentence
    InvalidSpan {
        sentence_id: String,
        start: usize,
        end: usize,
        assigned: Option<i64>,
    },
}

impl fmt::Display for LessonIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { sentence_id, word, assigned, deck_lesson } => write!(
                f,
                "{}: '{}' has l={} but deck says {}",
                sentence_id,
                word,
                LessonNumber(*assigned),
                LessonNumber(*deck_lesson)
            ),
            Self::NotInDeck { sentence_id, word, assigned } => write!(
                f,
                "{}: '{}' has l={} but NOT in deck",
                sentence_id,
                word,
                LessonNumber(*assigned)
            ),
            Self::InvalidSpan { sentence_id, start, end, assigned } => write!(
                f,
                "{}: span [{}, {}] has l={} but is outside the sentence text",
                sentence_id,
                start,
                end,
                LessonNumber(*assigned)
            ),
        }
    }
}

/// A sanctioned deviation from the deck lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideNotice {
    pub sentence_id: String,
    pub word: String,
    pub lesson: i64,
    pub deck_lesson: Option<i64>,
}

impl fmt::Display for OverrideNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INFO {}: '{}' l={} (deck={}) — contextual override",
            self.sentence_id,
            self.word,
            self.lesson,
            LessonNumber(self.deck_lesson)
        )
    }
}

// A missing or null lesson prints as `None`
struct LessonNumber(Option<i64>);

impl fmt::Display for LessonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(lesson) => write!(f, "{}", lesson),
            None => f.write_str("None"),
        }
    }
}

/// Outcome of checking one span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanVerdict {
    /// No `l` field on the span, nothing to check
    Unchecked,
    /// Lesson agrees with the deck
    Match,
    Override(OverrideNotice),
    Issue(LessonIssue),
}

/// Everything found while checking one story
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryReport {
    /// Failing findings in traversal order
    pub issues: Vec<LessonIssue>,
    /// Override notices in traversal order
    pub notices: Vec<OverrideNotice>,
    /// Number of spans that carried an `l` field
    pub spans_checked: usize,
}

impl StoryReport {
    /// A story passes when it has no issues; notices never fail it
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue lines as printed in the failure block
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Checks story spans against a deck and an override table
pub struct LessonValidator<'a> {
    deck: &'a Deck,
    overrides: &'a OverrideTable,
}

impl<'a> LessonValidator<'a> {
    pub fn new(deck: &'a Deck, overrides: &'a OverrideTable) -> Self {
        Self { deck, overrides }
    }

    /// Apply the lesson rule to a single span of `sentence`
    pub fn check_span(&self, sentence: &Sentence, span: &WordSpan) -> SpanVerdict {
        let Some(assigned) = span.lesson else {
            return SpanVerdict::Unchecked;
        };

        let sentence_id = sentence.display_id();
        let Some(word) = sentence.span_text(span) else {
            return SpanVerdict::Issue(LessonIssue::InvalidSpan {
                sentence_id: sentence_id.to_string(),
                start: span.start,
                end: span.end,
                assigned,
            });
        };

        let Some(entry) = self.deck.get(word) else {
            return SpanVerdict::Issue(LessonIssue::NotInDeck {
                sentence_id: sentence_id.to_string(),
                word: word.to_string(),
                assigned,
            });
        };

        if entry.lesson == assigned {
            SpanVerdict::Match
        } else if let Some(lesson) = assigned.filter(|&lesson| self.overrides.allows(word, lesson)) {
            SpanVerdict::Override(OverrideNotice {
                sentence_id: sentence_id.to_string(),
                word: word.to_string(),
                lesson,
                deck_lesson: entry.lesson,
            })
        } else {
            SpanVerdict::Issue(LessonIssue::Mismatch {
                sentence_id: sentence_id.to_string(),
                word: word.to_string(),
                assigned,
                deck_lesson: entry.lesson,
            })
        }
    }

    /// Check every span of `story` in document order.
    ///
    /// `on_notice` is called for each override notice as soon as it is
    /// found, before the traversal moves on.
    pub fn check_story<F>(&self, story: &Story, mut on_notice: F) -> StoryReport
    where
        F: FnMut(&OverrideNotice),
    {
        let mut report = StoryReport::default();

        for sentence in story.sentences() {
            for span in &sentence.words {
                let verdict = self.check_span(sentence, span);
                trace!("{} [{}, {}]: {:?}", sentence.display_id(), span.start, span.end, verdict);

                if span.has_lesson() {
                    report.spans_checked += 1;
                }

                match verdict {
                    SpanVerdict::Unchecked | SpanVerdict::Match => {}
                    SpanVerdict::Override(notice) => {
                        on_notice(&notice);
                        report.notices.push(notice);
                    }
                    SpanVerdict::Issue(issue) => report.issues.push(issue),
                }
            }
        }

        report
    }
}
