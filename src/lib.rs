//! ts-catalog
//!
//! Qt Linguist (`.ts`) 翻訳ファイルを読み込み、実行時に文字列を検索する
//! ロケールカタログ。
//!
//! - [`StringCatalog`]: 1 ロケール分の不変カタログ（`load` / `lookup`）
//! - [`format()`]: `%1`, `%2`, ... の位置指定プレースホルダー置換
//! - [`CatalogManager`]: アクティブなカタログの保持とロケール切り替え

pub mod catalog;
pub mod config;
pub mod format;
pub mod indexer;
pub mod input;
pub mod ir;
pub mod manager;
pub mod output;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use catalog::{
    CatalogStats,
    LoadOptions,
    Lookup,
    LookupMode,
    Resolved,
    StringCatalog,
};
pub use format::{
    FormatWarning,
    format,
    format_with_warnings,
};
pub use manager::{
    CatalogManager,
    SwitchError,
};
