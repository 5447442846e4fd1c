//! 翻訳ファイルの書き出し

mod ts_writer;

pub use ts_writer::{
    ExportError,
    write_ts,
};
