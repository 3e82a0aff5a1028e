/*!
 * Common test utilities for the deckcheck test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use deckcheck::app_config::Config;

/// Initialise test logging once; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Span as `(start, end, lesson)`
pub type SpanSpec = (usize, usize, Option<i64>);

/// Sentence as `(id, text, spans)`
pub type SentenceSpec<'a> = (&'a str, &'a str, &'a [SpanSpec]);

/// A project tree with `content/stories` and `content/flashcards`
pub struct ContentFixture {
    pub dir: TempDir,
}

impl ContentFixture {
    pub fn new() -> Result<Self> {
        let dir = create_temp_dir()?;
        fs::create_dir_all(dir.path().join("content").join("stories"))?;
        fs::create_dir_all(dir.path().join("content").join("flashcards"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Config rooted at this fixture
    pub fn config(&self) -> Config {
        Config {
            project_root: self.root().to_path_buf(),
            ..Config::default()
        }
    }

    /// Write `content/flashcards/<book>.json` from `(word, lesson)` pairs
    pub fn add_deck(&self, book: &str, words: &[(&str, Option<i64>)]) -> Result<PathBuf> {
        let words: Vec<serde_json::Value> = words
            .iter()
            .map(|(text, lesson)| match lesson {
                Some(l) => serde_json::json!({ "text_original": text, "lesson": l, "pinyin": "", "text_translation": "" }),
                None => serde_json::json!({ "text_original": text }),
            })
            .collect();
        let content = serde_json::json!({ "id": book, "words": words }).to_string();
        create_test_file(self.root(), &format!("content/flashcards/{}.json", book), &content)
    }

    /// Write a raw file under `content/stories/<book>/`
    pub fn add_raw_story(&self, book: &str, file_name: &str, content: &str) -> Result<PathBuf> {
        create_test_file(self.root(), &format!("content/stories/{}/{}", book, file_name), content)
    }

    /// Write a one-section story
    pub fn add_story(&self, book: &str, file_name: &str, sentences: &[SentenceSpec]) -> Result<PathBuf> {
        self.add_raw_story(book, file_name, &story_json(sentences))
    }
}

/// Build story JSON in the on-disk format
pub fn story_json(sentences: &[SentenceSpec]) -> String {
    let sentences: Vec<serde_json::Value> = sentences
        .iter()
        .map(|(id, text, spans)| {
            let words: Vec<serde_json::Value> = spans
                .iter()
                .map(|(start, end, lesson)| match lesson {
                    Some(l) => serde_json::json!({ "i": [start, end], "l": l }),
                    None => serde_json::json!({ "i": [start, end] }),
                })
                .collect();
            serde_json::json!({ "id": id, "text_original": text, "text_translation": "", "words": words })
        })
        .collect();

    serde_json::json!({ "id": "story", "sections": [ { "type": "text", "sentences": sentences } ] }).to_string()
}

/// Captured stdout of a validation run
pub fn output_string(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("diagnostics should be valid UTF-8")
}
