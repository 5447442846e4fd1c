//! Qt Linguist `.ts` ドキュメントの書き出し
//!
//! [`StringCatalog`] の全エントリ（obsolete とメタデータを含む）を書き出す。
//! 出力を読み直すと同じエントリ列になる。

use std::io;

use quick_xml::Writer;
use quick_xml::events::{
    BytesDecl,
    BytesEnd,
    BytesStart,
    BytesText,
    Event,
};
use thiserror::Error;

use crate::catalog::StringCatalog;
use crate::ir::{
    Entry,
    Location,
    Status,
};

/// カタログを書き出せなかった場合のエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write translation document: {0}")]
    Io(#[from] io::Error),

    #[error("Written document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// カタログを `.ts` の XML に変換する
///
/// 同じコンテキストが連続するエントリは 1 つの `<context>` にまとめる。
/// 後で再び現れたコンテキストは別のブロックにし、エントリの順序を保つ。
///
/// # Errors
/// XML の書き込みに失敗した場合は [`ExportError`]
pub fn write_ts(catalog: &StringCatalog) -> Result<String, ExportError> {
    let mut writer = TsWriter::new();
    writer.document(catalog)?;
    tracing::debug!(entries = catalog.len(), "Wrote translation document");
    writer.finish()
}

/// `.ts` 用のヘルパーを持つインデント付き XML ライター
struct TsWriter {
    /// 内部のイベントライター
    writer: Writer<Vec<u8>>,
}

impl TsWriter {
    /// lupdate と同じく 4 スペースでインデントするライターを作成
    fn new() -> Self {
        Self { writer: Writer::new_with_indent(Vec::new(), b' ', 4) }
    }

    /// 書き出したドキュメントを返す
    fn finish(self) -> Result<String, ExportError> {
        let mut text = String::from_utf8(self.writer.into_inner())?;
        text.push('\n');
        Ok(text)
    }

    /// イベントを 1 つ書く。ライターの失敗は I/O エラーに変換する
    fn event<'e>(&mut self, event: impl Into<Event<'e>>) -> Result<(), ExportError> {
        self.writer.write_event(event).map_err(io::Error::other)?;
        Ok(())
    }

    /// プロローグ、`<TS>` ルート、全コンテキストを書く
    fn document(&mut self, catalog: &StringCatalog) -> Result<(), ExportError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.event(Event::DocType(BytesText::from_escaped("TS")))?;

        let mut root = BytesStart::new("TS");
        for (name, value) in [
            ("version", catalog.version()),
            ("language", catalog.language()),
            ("sourcelanguage", catalog.source_language()),
        ] {
            if let Some(value) = value {
                root.push_attribute((name, value));
            }
        }
        self.event(Event::Start(root))?;

        for run in catalog.entries().chunk_by(|a, b| a.context == b.context) {
            let Some(first) = run.first() else {
                continue;
            };
            self.event(Event::Start(BytesStart::new("context")))?;
            self.text_element("name", &first.context)?;
            for entry in run {
                self.message(entry)?;
            }
            self.event(Event::End(BytesEnd::new("context")))?;
        }

        self.event(Event::End(BytesEnd::new("TS")))
    }

    /// `<message>` を 1 つ書く
    fn message(&mut self, entry: &Entry) -> Result<(), ExportError> {
        let mut start = BytesStart::new("message");
        if entry.numerus {
            start.push_attribute(("numerus", "yes"));
        }
        self.event(Event::Start(start))?;

        for location in &entry.locations {
            self.location(location)?;
        }
        self.text_element("source", &entry.source)?;
        if let Some(disambiguation) = &entry.disambiguation {
            self.text_element("comment", disambiguation)?;
        }
        if let Some(comment) = &entry.extra_comment {
            self.text_element("extracomment", comment)?;
        }
        if let Some(comment) = &entry.translator_comment {
            self.text_element("translatorcomment", comment)?;
        }
        self.translation(entry)?;

        self.event(Event::End(BytesEnd::new("message")))
    }

    /// `<location filename="..." line="..."/>`
    fn location(&mut self, location: &Location) -> Result<(), ExportError> {
        let mut start = BytesStart::new("location");
        if let Some(filename) = &location.filename {
            start.push_attribute(("filename", filename.as_str()));
        }
        if let Some(line) = &location.line {
            start.push_attribute(("line", line.as_str()));
        }
        self.event(Event::Empty(start))
    }

    /// `<translation>` を省くのは、翻訳が無く承認済みの場合だけ
    fn translation(&mut self, entry: &Entry) -> Result<(), ExportError> {
        if entry.translation.is_none()
            && entry.numerus_forms.is_empty()
            && entry.status == Status::Final
        {
            return Ok(());
        }

        let mut start = BytesStart::new("translation");
        if let Some(kind) = entry.status.type_attr() {
            start.push_attribute(("type", kind));
        }
        self.event(Event::Start(start))?;

        if entry.numerus_forms.is_empty() {
            self.text(entry.translation_or_empty())?;
        } else {
            let tag = if entry.numerus { "numerusform" } else { "lengthvariant" };
            for form in &entry.numerus_forms {
                self.text_element(tag, form)?;
            }
        }

        self.event(Event::End(BytesEnd::new("translation")))
    }

    /// `<name>text</name>`
    fn text_element(&mut self, name: &str, text: &str) -> Result<(), ExportError> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.text(text)?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// 文字データを書く。制御文字は `<byte>` でエスケープする
    ///
    /// 必ずテキストイベントで終えるので、要素の内側に改行は入らない。
    fn text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut run_start = 0;
        for (offset, ch) in text.char_indices() {
            if !needs_byte_escape(ch) {
                continue;
            }
            let run = text.get(run_start..offset).unwrap_or_default();
            self.event(Event::Text(BytesText::new(run)))?;
            let value = format!("x{:x}", u32::from(ch));
            let mut byte = BytesStart::new("byte");
            byte.push_attribute(("value", value.as_str()));
            self.event(Event::Empty(byte))?;
            run_start = offset + ch.len_utf8();
        }
        let rest = text.get(run_start..).unwrap_or_default();
        self.event(Event::Text(BytesText::new(rest)))
    }
}

/// XML 1.0 のテキストにそのまま書けない文字
fn needs_byte_escape(ch: char) -> bool {
    ch.is_control() && !matches!(ch, '\t' | '\n' | '\r')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        message,
        ts_doc,
    };

    fn rich_catalog() -> StringCatalog {
        let parts: &[&str] = &[
            "<context><name>@@@</name>",
            &message(
                "English",
                "<comment>Native language name</comment><translation>Português</translation>",
            ),
            "</context>",
            "<context><name>QIMessageBox</name>",
            &message("Yes", "<translation>Sim</translation>"),
            &message("Shared Folders", "<translation></translation>"),
            &message("Untranslated", ""),
            &message("Name", "<translation type=\"unfinished\">Nome</translation>"),
            &message("Discard", "<translation type=\"vanished\">Descartar</translation>"),
            &message(
                "A &lt;b&gt;&amp;&quot;quoted&quot;&apos;s&lt;/b&gt;",
                "<translation>  Um &lt;b&gt;&amp; <byte value=\"x1b\"/>[0m  </translation>",
            ),
            "</context>",
            "<context><name>UIMachineSettingsStorage</name>",
            "<message numerus=\"yes\">\
             <location filename=\"../src/settings/UIMachineSettingsStorage.cpp\" line=\"+12\"/>\
             <source>%n disk(s)</source>\
             <comment>Floppy tooltip</comment>\
             <extracomment>Shown in the storage tree</extracomment>\
             <translatorcomment>Checked with the manual</translatorcomment>\
             <translation><numerusform>%n disco</numerusform>\
             <numerusform>%n discos</numerusform></translation></message>",
            &message(
                "Choose",
                "<translation><lengthvariant>Escolher</lengthvariant>\
                 <lengthvariant>Esc.</lengthvariant></translation>",
            ),
            "</context>",
            "<context><name>QIMessageBox</name>",
            &message("No", "<translation>Não</translation>"),
            "</context>",
        ];
        StringCatalog::load(&ts_doc(&parts.join("\n"))).unwrap()
    }

    #[rstest]
    fn test_reload_yields_equal_entries() {
        let catalog = rich_catalog();

        let written = write_ts(&catalog).unwrap();
        let reloaded = StringCatalog::load(&written).unwrap();

        assert_eq!(reloaded.entries(), catalog.entries());
        assert_eq!(reloaded.version(), catalog.version());
        assert_eq!(reloaded.language(), catalog.language());
        assert_eq!(reloaded.source_language(), catalog.source_language());
        assert_eq!(reloaded.native_language_name(), Some("Português"));
    }

    #[googletest::test]
    fn test_written_document_shape() {
        let written = write_ts(&rich_catalog()).unwrap();

        expect_that!(written, starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        expect_that!(written, contains_substring("<!DOCTYPE TS>"));
        expect_that!(
            written,
            contains_substring("<TS version=\"2.1\" language=\"pt\" sourcelanguage=\"en\">")
        );
        expect_that!(written, contains_substring("<translation></translation>"));
        expect_that!(written, contains_substring("<translation type=\"unfinished\">Nome</translation>"));
        // vanished は正規の名前で書き戻す
        expect_that!(written, contains_substring("type=\"obsolete\""));
        expect_that!(written, contains_substring("<byte value=\"x1b\"/>"));
        expect_that!(written, contains_substring("<message numerus=\"yes\">"));
    }

    #[rstest]
    fn test_repeated_context_keeps_separate_blocks() {
        let written = write_ts(&rich_catalog()).unwrap();

        assert_eq!(written.matches("<name>QIMessageBox</name>").count(), 2);
    }

    #[rstest]
    fn test_empty_catalog() {
        let written = write_ts(&StringCatalog::empty(Some("en".to_string()))).unwrap();
        let reloaded = StringCatalog::load(&written).unwrap();

        assert!(reloaded.is_empty());
        assert_eq!(reloaded.language(), Some("en"));
    }

    #[rstest]
    #[case('\u{1b}', true)]
    #[case('\u{0}', true)]
    #[case('\t', false)]
    #[case('\n', false)]
    #[case('a', false)]
    #[case('ã', false)]
    fn test_needs_byte_escape(#[case] ch: char, #[case] expected: bool) {
        assert_eq!(needs_byte_escape(ch), expected);
    }
}
