//! 翻訳データの中間表現

mod entry;
mod metadata;

pub use entry::{
    Entry,
    Location,
    Status,
};
pub use metadata::{
    CatalogMetadata,
    DEFAULT_METADATA_CONTEXT,
};
