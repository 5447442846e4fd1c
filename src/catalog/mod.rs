//! 1 ロケール分の文字列カタログ
//!
//! # Invariants
//!
//! 1. **ロード後は不変**: [`StringCatalog`] は構築後に変更されない。
//!    `Send + Sync` であり、検索にロックは要らない。
//!
//! 2. **全部か無しか**: 不正なドキュメントは [`ParseError`] になり、
//!    カタログは作られない。
//!
//! 3. **ステータスが優先**: obsolete なエントリはテキストがあっても返さない。
//!    unfinished なエントリは [`LookupMode::Diagnostic`] でのみ返す。
//!
//! 4. **重複の解決は決定的**: 規則は [`lookup`] を参照。
//!
//! # Failure Modes
//!
//! | 失敗 | 原因 | 挙動 |
//! |------|------|------|
//! | 不正なドキュメント | XML の誤り、`<source>` 欠落など | `Err(ParseError)` |
//! | 未知のコンテキスト・原文 | ドキュメントに無い | `Lookup::Missing` |
//! | unfinished/obsolete のみ | 翻訳が未承認 | `Lookup::Missing` |
//! | メタデータコンテキストの検索 | 予約済みコンテキスト | `Lookup::Missing` |

mod index;
pub mod lookup;
mod stats;

use std::path::Path;

use index::KeyIndex;
pub use lookup::{
    Lookup,
    LookupMode,
    Resolved,
};
pub use stats::CatalogStats;

use crate::input::{
    LoadError,
    ParseError,
    TsDocument,
    load_ts_file,
    parse_ts_bytes,
    parse_ts_document,
};
use crate::ir::{
    CatalogMetadata,
    DEFAULT_METADATA_CONTEXT,
    Entry,
};

/// カタログ構築時のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// 予約済みメタデータコンテキストの名前
    ///
    /// 名前が空のコンテキストも常に予約済みとして扱う。
    pub metadata_context: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { metadata_context: DEFAULT_METADATA_CONTEXT.to_string() }
    }
}

/// 1 ロケール分の読み込み済み翻訳
///
/// # Example
///
/// ```
/// use ts_catalog::StringCatalog;
///
/// let catalog = StringCatalog::load(
///     r#"<TS version="2.1" language="pt">
///          <context>
///            <name>QIMessageBox</name>
///            <message><source>Yes</source><translation>Sim</translation></message>
///          </context>
///        </TS>"#,
/// )
/// .unwrap();
///
/// assert_eq!(catalog.lookup("QIMessageBox", "Yes", None).text(), Some("Sim"));
/// assert!(catalog.lookup("QIMessageBox", "Maybe", None).is_missing());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    /// ドキュメント順の全エントリ（obsolete とメタデータを含む）
    entries: Vec<Entry>,
    index: KeyIndex,
    metadata: CatalogMetadata,
    metadata_context: String,
}

impl StringCatalog {
    /// エントリを持たないカタログ（原文の言語そのものに使う）
    #[must_use]
    pub fn empty(language: Option<String>) -> Self {
        Self {
            language,
            metadata_context: DEFAULT_METADATA_CONTEXT.to_string(),
            ..Self::default()
        }
    }

    /// デフォルトのオプションで `.ts` ドキュメントを解析する
    ///
    /// # Errors
    /// Returns [`ParseError`] if the document is malformed.
    pub fn load(text: &str) -> Result<Self, ParseError> {
        Self::load_with(text, &LoadOptions::default())
    }

    /// `.ts` ドキュメントを解析する
    ///
    /// # Errors
    /// Returns [`ParseError`] if the document is malformed.
    pub fn load_with(text: &str, options: &LoadOptions) -> Result<Self, ParseError> {
        parse_ts_document(text).map(|document| Self::from_document(document, options))
    }

    /// UTF-8 のバイト列から `.ts` ドキュメントを解析する
    ///
    /// # Errors
    /// UTF-8 でない場合、またはドキュメントが不正な場合は [`ParseError`]
    pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Self, ParseError> {
        parse_ts_bytes(bytes).map(|document| Self::from_document(document, options))
    }

    /// `.ts` ファイルを読み込んで解析する
    ///
    /// # Errors
    /// 読み込みまたは解析に失敗した場合は [`LoadError`]
    pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Self, LoadError> {
        let document = load_ts_file(path)?;
        Ok(Self::from_document(document, options))
    }

    /// 解析済みドキュメントからカタログを構築する
    #[must_use]
    pub fn from_document(document: TsDocument, options: &LoadOptions) -> Self {
        let TsDocument { version, language, source_language, entries } = document;
        let metadata_context = options.metadata_context.clone();
        let is_metadata = |entry: &Entry| is_reserved(&metadata_context, &entry.context);

        let index = KeyIndex::build(&entries, |entry| !is_metadata(entry));
        let metadata = CatalogMetadata::from_entries(entries.iter().filter(|&entry| is_metadata(entry)));

        tracing::debug!(
            language = language.as_deref().unwrap_or("unknown"),
            entries = entries.len(),
            keys = index.key_count(),
            "Built string catalog"
        );

        Self { version, language, source_language, entries, index, metadata, metadata_context }
    }

    /// 本番表示用に翻訳を検索する
    ///
    /// unfinished と obsolete のエントリは返さない。重複の解決規則は
    /// [`lookup`](self::lookup) を参照。
    #[must_use]
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Lookup<'_> {
        self.lookup_with(context, source, disambiguation, LookupMode::Production)
    }

    /// 指定したモードで翻訳を検索する
    #[must_use]
    pub fn lookup_with(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        mode: LookupMode,
    ) -> Lookup<'_> {
        let positions = self.index.candidates(context, source);
        lookup::select(&self.entries, positions, disambiguation)
            .map_or(Lookup::Missing, |entry| lookup::resolve(entry, mode))
    }

    /// `context` が予約済みメタデータコンテキストかどうか
    #[must_use]
    pub fn is_metadata_context(&self, context: &str) -> bool {
        is_reserved(&self.metadata_context, context)
    }

    /// `<TS language>`、無ければファイル名から検出した言語
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// `<TS sourcelanguage>`
    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// `<TS version>`
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// メタデータ全体
    #[must_use]
    pub const fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// その言語自身での言語名（例: "Português"）
    #[must_use]
    pub fn native_language_name(&self) -> Option<&str> {
        self.metadata.native_language_name.as_deref()
    }

    /// 英語での言語名（例: "Portuguese"）
    #[must_use]
    pub fn language_name(&self) -> Option<&str> {
        self.metadata.language_name.as_deref()
    }

    /// 現地語での国名。国を問わないカタログでは空
    #[must_use]
    pub fn native_country_name(&self) -> Option<&str> {
        self.metadata.native_country_name.as_deref()
    }

    /// 英語での国名。現地語の国名が空なら空
    #[must_use]
    pub fn country_name(&self) -> Option<&str> {
        self.metadata.country_name.as_deref()
    }

    /// カンマ区切りの翻訳者クレジット
    #[must_use]
    pub fn credits(&self) -> Option<&str> {
        self.metadata.credits.as_deref()
    }

    /// 読み込んだ全エントリ（ドキュメント順）
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// 重複を除いたコンテキスト名（初出順）
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.context.as_str())
            .filter(move |context| seen.insert(*context))
    }

    /// 翻訳の進捗（メタデータコンテキストを除く）
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self.entries.iter().filter(|e| !self.is_metadata_context(&e.context)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 設定された名前、または空の名前が予約済みコンテキスト
fn is_reserved(metadata_context: &str, context: &str) -> bool {
    context.is_empty() || context == metadata_context
}
