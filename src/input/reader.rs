//! Qt Linguist `.ts` document reader
//!
//! Turns the XML text of a translation file into a flat, document-ordered
//! list of [`Entry`] values. Reading is all-or-nothing: the first problem
//! aborts with a [`ParseError`] and nothing is returned.

use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::{
    ParseError,
    ParseErrorKind,
};
use crate::ir::{
    Entry,
    Location,
    Status,
};
use crate::types::SourcePosition;

/// Contents of one `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TsDocument {
    /// `<TS version="...">`
    pub version: Option<String>,
    /// `<TS language="...">`
    pub language: Option<String>,
    /// `<TS sourcelanguage="...">`
    pub source_language: Option<String>,
    /// Every message in document order, including obsolete ones.
    pub entries: Vec<Entry>,
}

/// Parses a `.ts` document.
///
/// # Errors
/// Returns [`ParseError`] when the XML is malformed, the root is not `<TS>`,
/// a context has no name, a message has no source, or a translation carries
/// an unknown `type`.
pub fn parse_ts_document(text: &str) -> Result<TsDocument, ParseError> {
    TsParser::new(text).parse_document()
}

/// Like [`parse_ts_document`] but starting from raw bytes.
///
/// A leading UTF-8 byte order mark is ignored.
///
/// # Errors
/// Returns [`ParseErrorKind::Encoding`] if the bytes are not UTF-8, otherwise
/// the same errors as [`parse_ts_document`].
pub fn parse_ts_bytes(bytes: &[u8]) -> Result<TsDocument, ParseError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        let position = bytes
            .get(..e.valid_up_to())
            .and_then(|prefix| std::str::from_utf8(prefix).ok())
            .map_or_else(SourcePosition::default, |prefix| {
                SourcePosition::from_offset(prefix, prefix.len())
            });
        ParseError::new(ParseErrorKind::Encoding(e.to_string()), position)
    })?;
    parse_ts_document(text)
}

/// Pull parser over the quick-xml event stream.
struct TsParser<'a> {
    /// Full document text, used to turn byte offsets into line/column.
    text: &'a str,
    /// Underlying event reader.
    reader: Reader<&'a [u8]>,
    /// Name of the context currently being read, for error reporting.
    context: Option<String>,
}

impl<'a> TsParser<'a> {
    /// Creates a parser that keeps all whitespace inside text nodes.
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);
        Self { text, reader, context: None }
    }

    /// Current reader position.
    fn position(&self) -> SourcePosition {
        let offset = usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX);
        SourcePosition::from_offset(self.text, offset)
    }

    /// Builds an error at the current position.
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.position()).in_context(self.context.as_deref())
    }

    /// Builds a malformed-XML error at the current position.
    fn xml_error(&self, error: impl fmt::Display) -> ParseError {
        self.error(ParseErrorKind::Xml(error.to_string()))
    }

    /// Reads the next event, converting reader failures to [`ParseError`].
    fn next(&mut self) -> Result<Event<'a>, ParseError> {
        self.reader.read_event().map_err(|e| {
            let offset = usize::try_from(self.reader.error_position()).unwrap_or(usize::MAX);
            ParseError::new(
                ParseErrorKind::Xml(e.to_string()),
                SourcePosition::from_offset(self.text, offset),
            )
            .in_context(self.context.as_deref())
        })
    }

    /// Skips an element and its whole subtree.
    fn skip(&mut self, start: &BytesStart<'_>) -> Result<(), ParseError> {
        self.reader.read_to_end(start.name()).map_err(|e| self.xml_error(e))?;
        Ok(())
    }

    /// Reads an attribute value, unescaped.
    fn attribute(&self, start: &BytesStart<'_>, name: &str) -> Result<Option<String>, ParseError> {
        let Some(attribute) = start.try_get_attribute(name).map_err(|e| self.xml_error(e))? else {
            return Ok(None);
        };
        let value = attribute.unescape_value().map_err(|e| self.xml_error(e))?;
        Ok(Some(value.into_owned()))
    }

    /// Reads up to and including the `<TS>` root.
    fn parse_document(mut self) -> Result<TsDocument, ParseError> {
        loop {
            match self.next()? {
                Event::Start(start) => {
                    let mut document = self.open_root(&start)?;
                    self.parse_root(&mut document.entries)?;
                    tracing::debug!(entries = document.entries.len(), "Parsed translation document");
                    return Ok(document);
                }
                Event::Empty(start) => return self.open_root(&start),
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("TS".to_string())));
                }
                // Declaration, doctype, comments and whitespace before the root.
                _ => {}
            }
        }
    }

    /// Validates the root element and reads its header attributes.
    fn open_root(&self, start: &BytesStart<'_>) -> Result<TsDocument, ParseError> {
        if start.name().as_ref() != b"TS" {
            let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
            return Err(self.error(ParseErrorKind::UnexpectedRoot(name)));
        }
        Ok(TsDocument {
            version: self.attribute(start, "version")?,
            language: self.attribute(start, "language")?,
            source_language: self.attribute(start, "sourcelanguage")?,
            entries: Vec::new(),
        })
    }

    /// Reads the children of `<TS>`.
    fn parse_root(&mut self, entries: &mut Vec<Entry>) -> Result<(), ParseError> {
        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"context" => self.parse_context(entries)?,
                    _ => self.skip(&start)?,
                },
                Event::Empty(start) if start.name().as_ref() == b"context" => {
                    return Err(self.error(ParseErrorKind::MissingContextName));
                }
                Event::End(_) => return Ok(()),
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("TS".to_string())));
                }
                _ => {}
            }
        }
    }

    /// Reads one `<context>`; its messages get the context name once it is known.
    fn parse_context(&mut self, entries: &mut Vec<Entry>) -> Result<(), ParseError> {
        self.context = None;
        let mut name: Option<String> = None;
        let mut messages = Vec::new();

        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => {
                        let text = self.read_text("name")?;
                        self.context = Some(text.clone());
                        name = Some(text);
                    }
                    b"message" => messages.push(self.parse_message(&start)?),
                    _ => self.skip(&start)?,
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"name" => {
                        self.context = Some(String::new());
                        name = Some(String::new());
                    }
                    b"message" => return Err(self.error(ParseErrorKind::MissingSource)),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("context".to_string())));
                }
                _ => {}
            }
        }

        let Some(name) = name else {
            return Err(self.error(ParseErrorKind::MissingContextName));
        };
        entries.extend(messages.into_iter().map(|mut entry: Entry| {
            entry.context.clone_from(&name);
            entry
        }));
        self.context = None;
        Ok(())
    }

    /// Reads one `<message>`.
    fn parse_message(&mut self, start: &BytesStart<'_>) -> Result<Entry, ParseError> {
        let numerus = self.attribute(start, "numerus")?.as_deref() == Some("yes");
        let mut entry = Entry { numerus, ..Entry::default() };
        let mut source = None;

        loop {
            match self.next()? {
                Event::Start(child) => match child.name().as_ref() {
                    b"source" => source = Some(self.read_text("source")?),
                    b"comment" => {
                        entry.disambiguation = non_empty(self.read_text("comment")?);
                    }
                    b"extracomment" => entry.extra_comment = Some(self.read_text("extracomment")?),
                    b"translatorcomment" => {
                        entry.translator_comment = Some(self.read_text("translatorcomment")?);
                    }
                    b"location" => {
                        entry.locations.push(self.location(&child)?);
                        self.skip(&child)?;
                    }
                    b"translation" => self.parse_translation(&child, &mut entry)?,
                    _ => self.skip(&child)?,
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"source" => source = Some(String::new()),
                    b"location" => entry.locations.push(self.location(&child)?),
                    b"translation" => {
                        entry.status = self.status(&child)?;
                        entry.translation = Some(String::new());
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof("message".to_string())));
                }
                _ => {}
            }
        }

        entry.source = source.ok_or_else(|| self.error(ParseErrorKind::MissingSource))?;
        Ok(entry)
    }

    /// Reads `<translation>`, including numerus forms and length variants.
    fn parse_translation(
        &mut self,
        start: &BytesStart<'_>,
        entry: &mut Entry,
    ) -> Result<(), ParseError> {
        entry.status = self.status(start)?;
        let mut text = String::new();
        let mut forms = Vec::new();

        loop {
            let event = self.next()?;
            if self.append_text(&mut text, &event)? {
                continue;
            }
            match event {
                Event::Start(child) => match child.name().as_ref() {
                    b"numerusform" => forms.push(self.read_text("numerusform")?),
                    b"lengthvariant" => forms.push(self.read_text("lengthvariant")?),
                    _ => self.skip(&child)?,
                },
                Event::Empty(child)
                    if matches!(child.name().as_ref(), b"numerusform" | b"lengthvariant") =>
                {
                    forms.push(String::new());
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(
                        self.error(ParseErrorKind::UnexpectedEof("translation".to_string()))
                    );
                }
                _ => {}
            }
        }

        // With forms present, the text between them is only indentation.
        entry.translation = if forms.is_empty() { Some(text) } else { forms.first().cloned() };
        entry.numerus_forms = forms;
        Ok(())
    }

    /// Reads the character content of the element just opened.
    fn read_text(&mut self, tag: &str) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            let event = self.next()?;
            if self.append_text(&mut text, &event)? {
                continue;
            }
            match event {
                Event::Start(child) => self.skip(&child)?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(self.error(ParseErrorKind::UnexpectedEof(tag.to_string()))),
                _ => {}
            }
        }
    }

    /// Appends character content carried by `event` to `buffer`.
    ///
    /// Returns `false` for events that are not character content.
    fn append_text(&self, buffer: &mut String, event: &Event<'_>) -> Result<bool, ParseError> {
        match event {
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| self.xml_error(e))?;
                buffer.push_str(&text);
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(cdata)
                    .map_err(|e| self.error(ParseErrorKind::Encoding(e.to_string())))?;
                buffer.push_str(text);
            }
            Event::Empty(start) if start.name().as_ref() == b"byte" => {
                buffer.push(self.byte_escape(start)?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Decodes `<byte value="x1b"/>` (hex) or `<byte value="27"/>` (decimal).
    fn byte_escape(&self, start: &BytesStart<'_>) -> Result<char, ParseError> {
        let value = self.attribute(start, "value")?.unwrap_or_default();
        let code = match value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => value.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidByte(value.clone())))
    }

    /// Lifecycle state from the `type` attribute.
    fn status(&self, start: &BytesStart<'_>) -> Result<Status, ParseError> {
        let value = self.attribute(start, "type")?;
        Status::from_type_attr(value.as_deref()).ok_or_else(|| {
            self.error(ParseErrorKind::InvalidStatus(value.clone().unwrap_or_default()))
        })
    }

    /// `<location filename="..." line="..."/>`
    fn location(&self, start: &BytesStart<'_>) -> Result<Location, ParseError> {
        Ok(Location {
            filename: self.attribute(start, "filename")?,
            line: self.attribute(start, "line")?,
        })
    }
}

/// An empty `<comment>` carries no disambiguation.
fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
