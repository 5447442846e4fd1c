//! 検索結果と候補の解決規則
//!
//! # Resolution
//!
//! 1. 候補は `(context, source)` を共有するエントリ。
//! 2. 要求された disambiguation と一致する候補を残す。`None` は
//!    disambiguation の無いエントリを意味する。obsolete を含めて一致する
//!    候補が一つも無いときに限り、全候補を対象にする。
//! 3. obsolete なエントリを除く。obsolete しか一致しなかったキーは `Missing`。
//! 4. 残りのうち最後の `Final` を選び、無ければ最後に読み込んだものを選ぶ。
//! 5. 選ばれたのが `Unfinished` なら、本番モードでは `Missing`、
//!    診断モードでは暫定の結果になる。

use crate::ir::{
    Entry,
    Status,
};

/// 返してよいエントリの範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LookupMode {
    /// `Final` のみ返す
    #[default]
    Production,
    /// `Unfinished` も暫定として返す
    Diagnostic,
}

/// 検索で見つかった翻訳
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// 翻訳テキスト（意図的に空の場合もある）
    pub text: &'a str,
    /// `Unfinished` のエントリ由来なら `true`
    pub provisional: bool,
}

/// 検索の結果
///
/// `Missing` はエラーではない。呼び出し側は独自のフォールバック
/// （通常は原文）を表示する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Resolved(Resolved<'a>),
    Missing,
}

impl<'a> Lookup<'a> {
    /// 解決したテキスト
    #[must_use]
    pub const fn text(self) -> Option<&'a str> {
        match self {
            Self::Resolved(resolved) => Some(resolved.text),
            Self::Missing => None,
        }
    }

    /// 解決したテキスト、無ければ `fallback`
    #[must_use]
    pub const fn text_or(self, fallback: &'a str) -> &'a str {
        match self {
            Self::Resolved(resolved) => resolved.text,
            Self::Missing => fallback,
        }
    }

    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    #[must_use]
    pub const fn is_provisional(self) -> bool {
        matches!(self, Self::Resolved(Resolved { provisional: true, .. }))
    }
}

/// `positions` にある `(context, source)` の候補から、検索に答えるエントリを選ぶ
pub(crate) fn select<'a>(
    entries: &'a [Entry],
    positions: &[usize],
    disambiguation: Option<&str>,
) -> Option<&'a Entry> {
    let candidates = positions.iter().filter_map(|&position| entries.get(position));
    let any_match = candidates.clone().any(|entry| entry.matches_disambiguation(disambiguation));

    prefer_final(
        candidates
            .filter(move |entry| !any_match || entry.matches_disambiguation(disambiguation))
            .filter(|entry| entry.status.is_active()),
    )
}

/// 最後の `Final`、無ければ最後のエントリ
fn prefer_final<'a>(
    candidates: impl DoubleEndedIterator<Item = &'a Entry> + Clone,
) -> Option<&'a Entry> {
    candidates.clone().rev().find(|entry| entry.status == Status::Final).or_else(|| candidates.last())
}

/// 選んだエントリを検索結果に変換する
pub(crate) fn resolve(entry: &Entry, mode: LookupMode) -> Lookup<'_> {
    let text = entry.translation_or_empty();
    match (entry.status, mode) {
        (Status::Unfinished, LookupMode::Production) | (Status::Obsolete, _) => Lookup::Missing,
        (Status::Unfinished, LookupMode::Diagnostic) => {
            Lookup::Resolved(Resolved { text, provisional: true })
        }
        (Status::Final, _) => Lookup::Resolved(Resolved { text, provisional: false }),
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn entry(translation: &str, status: Status) -> Entry {
        Entry::new("UIMachineSettingsStorage", "Choose a file")
            .with_translation(translation)
            .with_status(status)
    }

    fn all(entries: &[Entry]) -> Vec<usize> {
        (0..entries.len()).collect()
    }

    fn selected(entries: &[Entry], disambiguation: Option<&str>) -> Option<String> {
        select(entries, &all(entries), disambiguation).map(|entry| entry.translation_or_empty().to_string())
    }

    #[rstest]
    fn test_select_prefers_final_over_later_unfinished() {
        let entries = [entry("final", Status::Final), entry("draft", Status::Unfinished)];

        assert_eq!(selected(&entries, None).as_deref(), Some("final"));
    }

    #[rstest]
    fn test_select_last_final_wins() {
        let entries = [
            entry("first", Status::Final),
            entry("draft", Status::Unfinished),
            entry("second", Status::Final),
        ];

        assert_eq!(selected(&entries, None).as_deref(), Some("second"));
    }

    #[rstest]
    fn test_select_last_unfinished_when_no_final() {
        let entries = [entry("old draft", Status::Unfinished), entry("new draft", Status::Unfinished)];

        assert_eq!(selected(&entries, None).as_deref(), Some("new draft"));
    }

    #[rstest]
    fn test_select_never_returns_obsolete() {
        let entries = [entry("retired", Status::Obsolete)];

        assert_eq!(selected(&entries, None), None);
    }

    #[rstest]
    fn test_select_obsolete_does_not_shadow_active() {
        let entries = [entry("current", Status::Final), entry("retired", Status::Obsolete)];

        assert_eq!(selected(&entries, None).as_deref(), Some("current"));
    }

    #[rstest]
    #[case::floppy(Some("Floppy tooltip"), "disquete")]
    #[case::dvd(Some("DVD-ROM tooltip"), "DVD")]
    #[case::unknown_falls_back(Some("HDD tooltip"), "DVD")]
    #[case::none_falls_back(None, "DVD")]
    fn test_select_disambiguation(#[case] disambiguation: Option<&str>, #[case] expected: &str) {
        let entries = [
            entry("disquete", Status::Final).with_disambiguation("Floppy tooltip"),
            entry("DVD", Status::Final).with_disambiguation("DVD-ROM tooltip"),
        ];

        assert_eq!(selected(&entries, disambiguation).as_deref(), Some(expected));
    }

    #[rstest]
    fn test_select_none_prefers_entry_without_disambiguation() {
        let entries = [
            entry("plain", Status::Final),
            entry("DVD", Status::Final).with_disambiguation("DVD-ROM tooltip"),
        ];

        assert_eq!(selected(&entries, None).as_deref(), Some("plain"));
    }

    #[rstest]
    fn test_select_obsolete_match_blocks_fallback() {
        let entries = [
            entry("retired", Status::Obsolete).with_disambiguation("Floppy tooltip"),
            entry("DVD", Status::Final).with_disambiguation("DVD-ROM tooltip"),
        ];

        assert_eq!(selected(&entries, Some("Floppy tooltip")), None);
        assert_eq!(selected(&entries, Some("DVD-ROM tooltip")).as_deref(), Some("DVD"));
    }

    #[rstest]
    fn test_select_obsolete_untagged_blocks_tagged_fallback() {
        let entries = [
            entry("retired", Status::Obsolete),
            entry("tagged", Status::Final).with_disambiguation("X"),
        ];

        assert_eq!(selected(&entries, None), None);
    }

    #[rstest]
    fn test_select_unmatched_disambiguation_skips_obsolete() {
        let entries = [
            entry("current", Status::Final).with_disambiguation("DVD-ROM tooltip"),
            entry("retired", Status::Obsolete).with_disambiguation("Floppy tooltip"),
        ];

        assert_eq!(selected(&entries, Some("HDD tooltip")).as_deref(), Some("current"));
    }

    #[rstest]
    #[case::final_production(Status::Final, LookupMode::Production, Some(("Sim", false)))]
    #[case::final_diagnostic(Status::Final, LookupMode::Diagnostic, Some(("Sim", false)))]
    #[case::unfinished_production(Status::Unfinished, LookupMode::Production, None)]
    #[case::unfinished_diagnostic(Status::Unfinished, LookupMode::Diagnostic, Some(("Sim", true)))]
    #[case::obsolete(Status::Obsolete, LookupMode::Diagnostic, None)]
    fn test_resolve(
        #[case] status: Status,
        #[case] mode: LookupMode,
        #[case] expected: Option<(&str, bool)>,
    ) {
        let entry = entry("Sim", status);

        let expected = expected.map_or(Lookup::Missing, |(text, provisional)| {
            Lookup::Resolved(Resolved { text, provisional })
        });
        assert_eq!(resolve(&entry, mode), expected);
    }

    #[rstest]
    fn test_lookup_helpers() {
        let resolved = Lookup::Resolved(Resolved { text: "", provisional: false });

        assert_that!(resolved.text(), some(eq("")));
        assert_that!(resolved.text_or("Cancel"), eq(""));
        assert_that!(resolved.is_missing(), eq(false));
        assert_that!(Lookup::Missing.text_or("Cancel"), eq("Cancel"));
        assert_that!(Lookup::Missing.is_missing(), eq(true));
        assert_that!(
            Lookup::Resolved(Resolved { text: "x", provisional: true }).is_provisional(),
            eq(true)
        );
    }
}
