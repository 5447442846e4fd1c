//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::input::normalize_language_code;

/// A translation file and the locale detected from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    /// Locale as spelled in the file name (e.g. `pt_BR`).
    pub locale: String,
    pub path: PathBuf,
}

impl LocaleFile {
    /// Whether this file serves `locale`, ignoring case and `-`/`_`.
    #[must_use]
    pub fn matches(&self, locale: &str) -> bool {
        normalize_language_code(&self.locale) == normalize_language_code(locale)
    }
}

#[derive(Error, Debug)]
pub enum IndexerError {
    /// The translations directory does not exist or is not a directory
    #[error("Invalid translations directory: {0}")]
    InvalidPath(String),
    /// The file pattern is not a valid glob
    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
