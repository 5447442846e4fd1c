use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::catalog::{
    LoadOptions,
    LookupMode,
};
use crate::ir::DEFAULT_METADATA_CONTEXT;

/// Name of the settings file looked up at the application root.
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "lookup.showUnfinished")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Directory holding the `.ts` files, relative to the application root.
    pub translations_dir: String,

    /// Glob selecting translation files inside `translations_dir`.
    pub file_pattern: String,

    /// Locale the UI is written in. Switching to it installs an empty
    /// catalog so every lookup falls back to the source text.
    pub default_locale: String,

    /// Name of the context carrying language metadata.
    pub metadata_context: String,

    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupConfig {
    /// Serve unfinished translations, marked as provisional.
    pub show_unfinished: bool,
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translations_dir.is_empty() {
            errors.push(ValidationError::new(
                "translationsDir",
                "The directory cannot be empty. Example: \"nls\"",
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"**/*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.file_pattern) {
            errors.push(ValidationError::new(
                "filePattern",
                format!("Invalid glob pattern '{}': {e}", self.file_pattern),
            ));
        }

        if self.default_locale.is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The locale cannot be empty. Example: \"en\"",
            ));
        }

        if self.metadata_context.is_empty() {
            errors.push(ValidationError::new(
                "metadataContext",
                "The context name cannot be empty. Example: \"@@@\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Lookup mode selected by `lookup.showUnfinished`.
    #[must_use]
    pub const fn lookup_mode(&self) -> LookupMode {
        if self.lookup.show_unfinished { LookupMode::Diagnostic } else { LookupMode::Production }
    }

    /// Options for loading catalogs with these settings.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions { metadata_context: self.metadata_context.clone() }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translations_dir: "nls".to_string(),
            file_pattern: "**/*.ts".to_string(),
            default_locale: "en".to_string(),
            metadata_context: DEFAULT_METADATA_CONTEXT.to_string(),
            lookup: LookupConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = CatalogSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLocale": "en_US", "lookup": {"showUnfinished": true}}"#;

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq("en_US"));
        assert_that!(settings.translations_dir, eq("nls"));
        assert_that!(settings.lookup.show_unfinished, eq(true));
        assert_that!(settings.lookup_mode(), eq(LookupMode::Diagnostic));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.translations_dir, eq("nls"));
        assert_that!(settings.file_pattern, eq("**/*.ts"));
        assert_that!(settings.default_locale, eq("en"));
        assert_that!(settings.metadata_context, eq("@@@"));
        assert_that!(settings.lookup_mode(), eq(LookupMode::Production));
    }

    #[rstest]
    fn load_options_use_metadata_context() {
        let settings =
            CatalogSettings { metadata_context: "__meta__".to_string(), ..CatalogSettings::default() };

        assert_that!(settings.load_options().metadata_context, eq("__meta__"));
    }

    #[rstest]
    #[case::translations_dir("translationsDir")]
    #[case::default_locale("defaultLocale")]
    #[case::metadata_context("metadataContext")]
    #[case::file_pattern("filePattern")]
    fn validate_empty_field(#[case] field: &str) {
        let mut settings = CatalogSettings::default();
        match field {
            "translationsDir" => settings.translations_dir.clear(),
            "defaultLocale" => settings.default_locale.clear(),
            "metadataContext" => settings.metadata_context.clear(),
            _ => settings.file_pattern.clear(),
        }

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq(field)),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_file_pattern_glob() {
        let settings =
            CatalogSettings { file_pattern: "**/*.{ts".to_string(), ..CatalogSettings::default() };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("filePattern")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("**/*.{ts"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = CatalogSettings {
            translations_dir: String::new(),
            default_locale: String::new(),
            ..CatalogSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. translationsDir"));
        assert_that!(error_message, contains_substring("2. defaultLocale"));
        assert_that!(error_message, contains_substring("cannot be empty"));
    }
}
