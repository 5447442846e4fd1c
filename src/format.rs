//! 位置指定プレースホルダ（`%1`, `%2`, ...）の置換
//!
//! 翻訳テキストは信頼できない入力として扱う。解釈するのは `%N` だけで、
//! 引数のテキストはそのまま挿入し、再走査しない。

use thiserror::Error;

/// プレースホルダ番号の上限（最大 2 桁）
const MAX_PLACEHOLDER: usize = 99;

/// 対応する引数が無かったプレースホルダ
///
/// 致命的ではない。プレースホルダは文字どおり出力に残る。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("placeholder %{index} at byte {offset} has no argument ({available} supplied)")]
pub struct FormatWarning {
    /// 1 始まりのプレースホルダ番号
    pub index: usize,
    /// 入力テキスト中の `%` のバイトオフセット
    pub offset: usize,
    /// 渡された引数の数
    pub available: usize,
}

/// `%1`〜`%99` を `args` の対応する要素で置換する
///
/// 引数が足りないプレースホルダはログに残し、そのままにする。
///
/// # Examples
///
/// ```
/// use ts_catalog::format;
///
/// assert_eq!(format("%2 of %1", &["10", "3"]), "3 of 10");
/// assert_eq!(format("100%", &["x"]), "100%");
/// ```
#[must_use]
pub fn format<S: AsRef<str>>(text: &str, args: &[S]) -> String {
    let (formatted, warnings) = format_with_warnings(text, args);
    for warning in &warnings {
        tracing::warn!(
            index = warning.index,
            offset = warning.offset,
            available = warning.available,
            "Missing argument for placeholder"
        );
    }
    formatted
}

/// [`format`] と同じだが、警告をログに出さずに返す
#[must_use]
pub fn format_with_warnings<S: AsRef<str>>(text: &str, args: &[S]) -> (String, Vec<FormatWarning>) {
    let mut output = String::with_capacity(text.len());
    let mut warnings = Vec::new();
    let mut rest = text;
    let mut consumed = 0;

    while let Some(percent) = rest.find('%') {
        let (literal, tail) = rest.split_at(percent);
        output.push_str(literal);

        let digits = placeholder_digits(tail);
        let Some((index, token_len)) = parse_index(tail, digits) else {
            output.push('%');
            rest = tail.get(1..).unwrap_or_default();
            consumed += percent + 1;
            continue;
        };

        let token = tail.get(..token_len).unwrap_or_default();
        if let Some(arg) = index.checked_sub(1).and_then(|i| args.get(i)) {
            output.push_str(arg.as_ref());
        } else {
            output.push_str(token);
            warnings.push(FormatWarning {
                index,
                offset: consumed + percent,
                available: args.len(),
            });
        }
        rest = tail.get(token_len..).unwrap_or_default();
        consumed += percent + token_len;
    }
    output.push_str(rest);

    (output, warnings)
}

/// 先頭の `%` に続く ASCII 数字の桁数（最大 2）
fn placeholder_digits(token: &str) -> usize {
    token.bytes().skip(1).take(2).take_while(u8::is_ascii_digit).count()
}

/// プレースホルダ番号とトークンのバイト長。ただの `%` なら `None`
///
/// `%0` はプレースホルダではない。
fn parse_index(token: &str, digits: usize) -> Option<(usize, usize)> {
    if digits == 0 || token.as_bytes().get(1) == Some(&b'0') {
        return None;
    }
    let index: usize = token.get(1..=digits)?.parse().ok()?;
    (index <= MAX_PLACEHOLDER).then_some((index, digits + 1))
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_format_markup_left_untouched() {
        let text = "&lt;b&gt;%1&lt;/b&gt; requires Qt %2.x, found Qt %3.";

        let result = format(text, &["VBoxSVC", "5", "4.8.2"]);

        expect_that!(result, eq("&lt;b&gt;VBoxSVC&lt;/b&gt; requires Qt 5.x, found Qt 4.8.2."));
    }

    #[rstest]
    #[case::out_of_order("%2 of %1", &["10", "3"], "3 of 10")]
    #[case::repeated("%1 and %1", &["a"], "a and a")]
    #[case::non_contiguous("%1-%3", &["a", "b", "c"], "a-c")]
    #[case::literal_percent("100% done", &["x"], "100% done")]
    #[case::trailing_percent("50%", &["x"], "50%")]
    #[case::double_percent("%%1", &["x"], "%x")]
    #[case::zero_is_literal("%0 %1", &["x"], "%0 x")]
    #[case::two_digits("%10", &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"], "j")]
    #[case::third_digit_is_text("%123", &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"], "l3")]
    #[case::no_placeholders("Cancel", &[], "Cancel")]
    #[case::multibyte("Não %1 é", &["há"], "Não há é")]
    fn test_format(#[case] text: &str, #[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(format(text, args), expected);
    }

    #[rstest]
    fn test_arguments_are_not_rescanned() {
        assert_eq!(format("%1 %2", &["%2", "b"]), "%2 b");
    }

    #[rstest]
    fn test_missing_argument_warns_and_keeps_placeholder() {
        let (result, warnings) = format_with_warnings("Qt %2 (%3)", &["x", "5"]);

        assert_eq!(result, "Qt 5 (%3)");
        assert_eq!(warnings, vec![FormatWarning { index: 3, offset: 7, available: 2 }]);
    }

    #[rstest]
    fn test_warning_offset_after_multibyte_text() {
        let (_, warnings) = format_with_warnings("Não %1", &[] as &[&str]);

        assert_eq!(warnings, vec![FormatWarning { index: 1, offset: 5, available: 0 }]);
    }

    #[rstest]
    fn test_warning_display() {
        let warning = FormatWarning { index: 3, offset: 7, available: 2 };

        assert_that!(warning.to_string(), contains_substring("%3"));
    }
}
