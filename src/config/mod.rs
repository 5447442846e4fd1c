//! カタログ設定
mod loader;
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    CONFIG_FILE_NAME,
    CatalogSettings,
    ConfigError,
    LookupConfig,
    ValidationError,
};
