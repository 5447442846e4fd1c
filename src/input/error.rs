use thiserror::Error;

use crate::types::SourcePosition;

/// What went wrong while reading a translation document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The document is not well-formed XML
    #[error("malformed XML: {0}")]
    Xml(String),
    /// The document is not valid UTF-8
    #[error("invalid encoding: {0}")]
    Encoding(String),
    /// The root element is not `<TS>`
    #[error("expected <TS> root element, found <{0}>")]
    UnexpectedRoot(String),
    /// The document ended inside an element
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
    /// A `<context>` has no `<name>` element
    #[error("context without a <name> element")]
    MissingContextName,
    /// A `<message>` has no `<source>` element
    #[error("message without a <source> element")]
    MissingSource,
    /// A `<translation type="...">` value is not recognised
    #[error("unknown translation type '{0}'")]
    InvalidStatus(String),
    /// A `<byte value="...">` escape does not encode a character
    #[error("invalid byte escape '{0}'")]
    InvalidByte(String),
}

/// Error returned when a translation document cannot be loaded.
///
/// Loading is all-or-nothing: no catalog is produced alongside this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {position}{}", format_context(.context))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: SourcePosition,
    /// Name of the enclosing `<context>`, when already known.
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: SourcePosition) -> Self {
        Self { kind, position, context: None }
    }

    #[must_use]
    pub fn in_context(mut self, context: Option<&str>) -> Self {
        if self.context.is_none() {
            self.context = context.map(str::to_string);
        }
        self
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<String>) -> String {
    context.as_deref().map_or_else(String::new, |name| format!(" (in context '{name}')"))
}

/// Error returned when a translation file cannot be loaded from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read translation file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse translation file: {0}")]
    Parse(#[from] ParseError),
}
