//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

/// `.ts` ドキュメントを組み立てる
///
/// # Arguments
/// * `body` - `<TS>` 要素の中身（`<context>` の並び）
///
/// # Returns
/// `language="pt"` のヘッダーを持つ完全なドキュメント
pub(crate) fn ts_doc(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n\
         <TS version=\"2.1\" language=\"pt\" sourcelanguage=\"en\">\n{body}\n</TS>\n"
    )
}

/// 単一コンテキストの `.ts` ドキュメントを組み立てる
///
/// # Arguments
/// * `context` - コンテキスト名
/// * `messages` - `<message>` 要素の並び
pub(crate) fn ts_context(context: &str, messages: &str) -> String {
    ts_doc(&format!("<context>\n<name>{context}</name>\n{messages}\n</context>"))
}

/// `<message>` 要素を組み立てる
///
/// # Arguments
/// * `source` - 原文（エスケープ済み）
/// * `rest` - `<translation>` 要素などの残りの中身
pub(crate) fn message(source: &str, rest: &str) -> String {
    format!("<message>\n<source>{source}</source>\n{rest}\n</message>")
}
