//! 予約済みコンテキストが持つカタログ単位のメタデータ

use super::{
    Entry,
    Status,
};

/// VirtualBox 形式のカタログが使う予約済みメタデータコンテキスト名
pub const DEFAULT_METADATA_CONTEXT: &str = "@@@";

/// メタデータメッセージを識別するコメントの接頭辞
///
/// 英語の国名のコメントは現地語の国名の接頭辞でも始まるため、判定順に注意。
const ENGLISH_COUNTRY_NAME: &str = "Native language country name, in English";
const NATIVE_COUNTRY_NAME: &str = "Native language country name";
const NATIVE_LANGUAGE_NAME: &str = "Native language name";
const LANGUAGE_NAME: &str = "Language name, in English";
const CREDITS: &str = "Comma-separated list of translators";

/// カタログが宣言する言語名と翻訳者クレジット
///
/// 宣言が無ければ `None`、空の値を宣言していれば `Some("")`
/// （例: 国を問わないカタログの国名）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogMetadata {
    pub native_language_name: Option<String>,
    pub language_name: Option<String>,
    pub native_country_name: Option<String>,
    pub country_name: Option<String>,
    pub credits: Option<String>,
}

impl CatalogMetadata {
    /// 予約済みコンテキストのエントリからメタデータを集める
    ///
    /// 検索と同じく `Final` のメッセージだけを採用する。同じ項目が複数回
    /// 宣言されていれば最後のものを使う。
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut metadata = Self::default();

        for entry in entries {
            if entry.status != Status::Final {
                continue;
            }
            let Some(comment) = entry.disambiguation.as_deref() else {
                continue;
            };
            let Some(slot) = metadata.slot_for(comment) else {
                tracing::debug!(comment, "Ignoring unknown metadata message");
                continue;
            };
            *slot = Some(entry.translation_or_empty().to_string());
        }

        metadata
    }

    /// コメントに対応する格納先
    fn slot_for(&mut self, comment: &str) -> Option<&mut Option<String>> {
        if comment.starts_with(ENGLISH_COUNTRY_NAME) {
            Some(&mut self.country_name)
        } else if comment.starts_with(NATIVE_COUNTRY_NAME) {
            Some(&mut self.native_country_name)
        } else if comment.starts_with(NATIVE_LANGUAGE_NAME) {
            Some(&mut self.native_language_name)
        } else if comment.starts_with(LANGUAGE_NAME) {
            Some(&mut self.language_name)
        } else if comment.starts_with(CREDITS) {
            Some(&mut self.credits)
        } else {
            None
        }
    }

    /// カンマ区切りのクレジットから翻訳者名を取り出す
    pub fn translators(&self) -> impl Iterator<Item = &str> {
        self.credits
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
