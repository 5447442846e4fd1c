//! 設定ファイルの読み込み

use std::io::ErrorKind;
use std::path::Path;

use super::{
    CONFIG_FILE_NAME,
    CatalogSettings,
    ConfigError,
};

/// `root` 直下の `.ts-catalog.json` を読み込む
///
/// ファイルが無ければ `Ok(None)`。Windows のエディタが付ける BOM は読み飛ばす。
pub(super) fn load_from_root(root: &Path) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No configuration file");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let json = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let settings: CatalogSettings = serde_json::from_str(json)?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration file");

    Ok(Some(settings))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case::plain(r#"{"translationsDir": "translations"}"#)]
    #[case::with_bom("\u{feff}{\"translationsDir\": \"translations\"}")]
    fn test_load_from_root_reads_settings(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), content).unwrap();

        let settings = load_from_root(temp_dir.path()).unwrap().unwrap();

        assert_eq!(settings.translations_dir, "translations");
        assert_eq!(settings.default_locale, "en");
    }

    #[rstest]
    fn test_load_from_root_without_file() {
        let temp_dir = TempDir::new().unwrap();

        assert!(load_from_root(temp_dir.path()).unwrap().is_none());
    }

    #[rstest]
    fn test_load_from_root_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[rstest]
    fn test_load_from_root_unreadable_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
