/*!
 * Flashcard deck loading.
 *
 * A deck maps the exact text of a word to the lesson that introduces it.
 * Keys are compared verbatim: no normalisation, no partial matches.
 */

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::errors::ContentError;

/// Deck file as stored on disk
#[derive(Debug, Deserialize)]
struct DeckFile {
    words: Vec<DeckWord>,
}

#[derive(Debug, Deserialize)]
struct DeckWord {
    text_original: String,
    #[serde(default)]
    lesson: Option<i64>,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    text_translation: String,
    #[serde(default)]
    text_translation_ru: String,
}

/// A single flashcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub text: String,
    pub lesson: Option<i64>,
    pub pinyin: String,
    pub translation: String,
    pub translation_ru: String,
}

impl From<DeckWord> for DeckEntry {
    fn from(word: DeckWord) -> Self {
        Self {
            text: word.text_original,
            lesson: word.lesson,
            pinyin: word.pinyin,
            translation: word.text_translation,
            translation_ru: word.text_translation_ru,
        }
    }
}

/// Lookup of deck entries keyed by exact word text
#[derive(Debug, Clone, Default)]
pub struct Deck {
    entries: HashMap<String, DeckEntry>,
}

impl Deck {
    /// Read and parse a deck file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::from_io(path, e))?;
        let deck = Self::from_json_str(path, &content)?;
        debug!("Loaded {} deck entries from {:?}", deck.len(), path);
        Ok(deck)
    }

    /// Parse deck JSON; `path` is only used for error reporting
    pub fn from_json_str(path: &Path, content: &str) -> Result<Self, ContentError> {
        let file: DeckFile = serde_json::from_str(content).map_err(|e| ContentError::from_json(path, e))?;
        Ok(Self::from_entries(file.words.into_iter().map(DeckEntry::from)))
    }

    /// Build a deck from entries; a later duplicate replaces an earlier one
    pub fn from_entries<I: IntoIterator<Item = DeckEntry>>(entries: I) -> Self {
        let mut map = HashMap::new();
        for entry in entries {
            map.insert(entry.text.clone(), entry);
        }
        Self { entries: map }
    }

    pub fn get(&self, text: &str) -> Option<&DeckEntry> {
        self.entries.get(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
