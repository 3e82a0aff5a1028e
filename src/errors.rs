/*!
 * Error types for the deckcheck application.
 *
 * Hard failures (missing files, malformed JSON, documents lacking the
 * expected structure) are modelled here with thiserror. Content findings
 * such as lesson mismatches are not errors; they live in the validation
 * report instead.
 */

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a deck or story file
#[derive(Error, Debug)]
pub enum ContentError {
    /// The file does not exist
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but lacks the expected structure
    #[error("Unexpected document structure in {}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    /// Classify a serde_json failure into a parse or schema error
    pub fn from_json(path: &Path, source: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match source.classify() {
            Category::Data => Self::Schema { path: path.to_path_buf(), source },
            Category::Io | Category::Syntax | Category::Eof => Self::Parse { path: path.to_path_buf(), source },
        }
    }

    /// Map an io failure, keeping "not found" distinct
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path: path.to_path_buf() }
        } else {
            Self::Io { path: path.to_path_buf(), source }
        }
    }

    /// Path of the file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Schema { path, .. } => path,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error loading content files
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing diagnostics failed
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    /// Missing or malformed command line arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<ContentError>() {
            Ok(content) => Self::Content(content),
            Err(other) => Self::Unknown(format!("{:#}", other)),
        }
    }
}
