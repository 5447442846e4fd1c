//! カタログの翻訳進捗

use crate::ir::{
    Entry,
    Status,
};

/// ライフサイクル状態ごとのエントリ数
///
/// メタデータコンテキストのエントリは数えない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    /// 翻訳が無いか空である有効なエントリ
    pub untranslated: usize,
}

impl CatalogStats {
    pub(crate) fn collect<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            match entry.status {
                Status::Final => stats.finished += 1,
                Status::Unfinished => stats.unfinished += 1,
                Status::Obsolete => {
                    stats.obsolete += 1;
                    continue;
                }
            }
            if entry.translation_or_empty().is_empty() {
                stats.untranslated += 1;
            }
        }
        stats
    }

    /// 有効なエントリのうち完了したものの割合（0〜100 のパーセント）
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        let active = self.finished + self.unfinished;
        if active == 0 {
            return 100;
        }
        u8::try_from(self.finished * 100 / active).unwrap_or(100)
    }
}
