/*!
 * Contextual overrides.
 *
 * Some words are in the deck under one meaning but a story uses another
 * meaning introduced in a later lesson. Each sanctioned `(word, lesson)`
 * pair turns the resulting mismatch into an informational notice.
 */

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One sanctioned `(word, lesson)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub word: String,
    pub lesson: i64,
}

impl OverrideEntry {
    pub fn new(word: impl Into<String>, lesson: i64) -> Self {
        Self { word: word.into(), lesson }
    }
}

/// Immutable set of sanctioned overrides
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    pairs: HashSet<(String, i64)>,
}

impl OverrideTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The overrides shipped with the tool
    pub fn builtin() -> Self {
        // Deck has 贵 at L1 (你贵姓, honorific); stories use it as "expensive" (L10)
        Self::from_entries([OverrideEntry::new("贵", 10)])
    }

    pub fn from_entries<I: IntoIterator<Item = OverrideEntry>>(entries: I) -> Self {
        Self {
            pairs: entries.into_iter().map(|e| (e.word, e.lesson)).collect(),
        }
    }

    /// Copy of this table with `extra` pairs added
    pub fn with_entries<I: IntoIterator<Item = OverrideEntry>>(&self, extra: I) -> Self {
        let mut pairs = self.pairs.clone();
        pairs.extend(extra.into_iter().map(|e| (e.word, e.lesson)));
        Self { pairs }
    }

    /// Whether `word` may carry `lesson` even though the deck disagrees
    pub fn allows(&self, word: &str, lesson: i64) -> bool {
        self.pairs.contains(&(word.to_string(), lesson))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
