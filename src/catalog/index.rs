//! 読み込んだエントリに対する `(context, source)` のハッシュインデックス

use std::collections::HashMap;

use crate::ir::Entry;

/// `context → source → エントリ位置` の対応表
///
/// 位置はロード順に保持する。重複はここでは畳まず、検索時に解決する。
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyIndex {
    /// コンテキストと原文ごとの候補位置
    contexts: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl KeyIndex {
    /// `include` が `true` を返すエントリをすべて登録する
    pub(crate) fn build(entries: &[Entry], include: impl Fn(&Entry) -> bool) -> Self {
        let mut contexts: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            if !include(entry) {
                continue;
            }
            contexts
                .entry(entry.context.clone())
                .or_default()
                .entry(entry.source.clone())
                .or_default()
                .push(position);
        }

        Self { contexts }
    }

    /// `(context, source)` を共有するエントリの位置（古い順）
    pub(crate) fn candidates(&self, context: &str, source: &str) -> &[usize] {
        self.contexts
            .get(context)
            .and_then(|sources| sources.get(source))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 異なる `(context, source)` キーの数
    pub(crate) fn key_count(&self) -> usize {
        self.contexts.values().map(HashMap::len).sum()
    }
}
