//! Core types used throughout the project.

use std::fmt;

/// A position in a resource document (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    /// Byte offset from the start of the document.
    pub offset: usize,
    pub line: u32,
    /// Column in characters, not bytes.
    pub character: u32,
}

impl SourcePosition {
    /// Computes the line and column of a byte offset in `text`.
    ///
    /// Offsets past the end of the text are clamped to the end.
    /// Offsets inside a multi-byte character count that character.
    #[must_use]
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line: u32 = 0;
        let mut character: u32 = 0;

        for (index, ch) in text.char_indices() {
            if index >= offset {
                break;
            }
            if ch == '\n' {
                line = line.saturating_add(1);
                character = 0;
            } else {
                character = character.saturating_add(1);
            }
        }

        Self { offset, line, character }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}",
            u64::from(self.line) + 1,
            u64::from(self.character) + 1
        )
    }
}
