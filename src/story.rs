/*!
 * Story documents: sections of sentences annotated with word spans.
 *
 * Only the fields the lesson check needs are modelled. Everything else a
 * story carries (translations, audio, HSK levels) is ignored on load.
 */

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::errors::ContentError;

/// Sentence id used when a sentence has none
pub const UNKNOWN_SENTENCE_ID: &str = "?";

/// A parsed story file
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

/// A sentence and the spans annotated over its text
#[derive(Debug, Clone, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub id: Option<String>,

    /// Source text; span offsets index into this
    #[serde(default)]
    pub text_original: String,

    #[serde(default)]
    pub words: Vec<WordSpan>,
}

/// Character range `[start, end)` over a sentence's text, optionally tagged
/// with the lesson that introduces the word.
///
/// `lesson` is `None` when the span has no `l` field and `Some(None)` when
/// the field is present but `null`. Only the first is exempt from checking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawWordSpan")]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub lesson: Option<Option<i64>>,
}

// On disk a span is `{ "i": [start, end], "l": lesson }`
#[derive(Deserialize)]
struct RawWordSpan {
    i: (usize, usize),
    #[serde(default, deserialize_with = "present_field")]
    l: Option<Option<i64>>,
}

// Missing fields fall back to `default`; this only runs when `l` is present
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

impl From<RawWordSpan> for WordSpan {
    fn from(raw: RawWordSpan) -> Self {
        Self {
            start: raw.i.0,
            end: raw.i.1,
            lesson: raw.l,
        }
    }
}

impl WordSpan {
    /// Span with a numeric lesson, or without an `l` field when `lesson` is `None`
    pub fn new(start: usize, end: usize, lesson: Option<i64>) -> Self {
        Self { start, end, lesson: lesson.map(Some) }
    }

    /// Span whose `l` field is present but `null`
    pub fn with_null_lesson(start: usize, end: usize) -> Self {
        Self { start, end, lesson: Some(None) }
    }

    /// True when the span carries an `l` field, even a `null` one
    pub fn has_lesson(&self) -> bool {
        self.lesson.is_some()
    }
}

impl Story {
    /// Read and parse a story file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::from_io(path, e))?;
        Self::from_json_str(path, &content)
    }

    /// Parse story JSON; `path` is only used for error reporting
    pub fn from_json_str(path: &Path, content: &str) -> Result<Self, ContentError> {
        serde_json::from_str(content).map_err(|e| ContentError::from_json(path, e))
    }

    /// All sentences in document order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections.iter().flat_map(|section| section.sentences.iter())
    }
}

impl Sentence {
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or(UNKNOWN_SENTENCE_ID)
    }

    /// Characters covered by `span`, or `None` when the span is empty,
    /// inverted or runs past the end of the text.
    ///
    /// Offsets count Unicode scalar values, not bytes.
    pub fn span_text(&self, span: &WordSpan) -> Option<&str> {
        if span.start >= span.end {
            return None;
        }

        let text = self.text_original.as_str();
        let mut boundaries = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()));

        let start = boundaries.nth(span.start)?;
        let end = boundaries.nth(span.end - span.start - 1)?;
        Some(&text[start..end])
    }
}
