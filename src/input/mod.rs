//! 翻訳ファイルの読み込み

mod error;
mod reader;
mod translation;

pub use error::{
    LoadError,
    ParseError,
    ParseErrorKind,
};
pub use reader::{
    TsDocument,
    parse_ts_bytes,
    parse_ts_document,
};
pub(crate) use translation::fill_language;
pub use translation::{
    detect_language_from_path,
    load_ts_file,
    normalize_language_code,
};
