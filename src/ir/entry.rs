//! 翻訳エントリ

use std::fmt;

/// 翻訳エントリのライフサイクル
///
/// `.ts` ファイルの `<translation type="...">` 属性に対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// 承認済み（`type` 属性なし）
    #[default]
    Final,
    /// 未レビュー（`type="unfinished"`）
    Unfinished,
    /// 廃止済み（`type="obsolete"` または `type="vanished"`）
    Obsolete,
}

impl Status {
    /// `type` 属性の値から変換する
    ///
    /// 未知の値の場合は `None` を返す。
    #[must_use]
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Final),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete" | "vanished") => Some(Self::Obsolete),
            Some(_) => None,
        }
    }

    /// 書き出し時の `type` 属性値
    #[must_use]
    pub const fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Final => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// 検索対象になり得るか
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Obsolete)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Final => "final",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
        };
        f.write_str(name)
    }
}

/// `<location filename="..." line="..."/>`
///
/// `line` is kept as text since lupdate may write relative values such as `+3`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
}

/// 翻訳可能な単位（`<message>` 要素 1 つ分）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// コンテキスト名（UI コンポーネント名）
    pub context: String,

    /// 翻訳前の原文
    pub source: String,

    /// 同じ原文を区別するためのコメント（`<comment>`）
    pub disambiguation: Option<String>,

    /// 翻訳文
    ///
    /// `None` は `<translation>` 要素なし、`Some("")` は意図的な空文字。
    pub translation: Option<String>,

    pub status: Status,

    /// `numerus="yes"` のメッセージか
    pub numerus: bool,

    /// `<numerusform>` / `<lengthvariant>` の並び
    pub numerus_forms: Vec<String>,

    /// 開発者向けコメント（`<extracomment>`）
    pub extra_comment: Option<String>,

    /// 翻訳者コメント（`<translatorcomment>`）
    pub translator_comment: Option<String>,

    pub locations: Vec<Location>,
}

impl Entry {
    /// 最小限のフィールドでエントリを作成する
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self { context: context.into(), source: source.into(), ..Self::default() }
    }

    /// 翻訳文を設定する
    #[must_use]
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// 区別用コメントを設定する
    #[must_use]
    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into());
        self
    }

    /// ステータスを設定する
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// 表示用の翻訳文（なければ空文字）
    #[must_use]
    pub fn translation_or_empty(&self) -> &str {
        self.translation.as_deref().unwrap_or_default()
    }

    /// 区別用コメントが一致するか
    ///
    /// 大文字小文字を区別し、`None` は区別用コメントなしのエントリにのみ一致する。
    #[must_use]
    pub fn matches_disambiguation(&self, disambiguation: Option<&str>) -> bool {
        self.disambiguation.as_deref() == disambiguation
    }
}
