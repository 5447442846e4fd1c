//! Translation file discovery.

mod scanner;
mod types;

pub use scanner::LocaleIndexer;
pub use types::{
    IndexerError,
    LocaleFile,
};
