//! Locale file scanner
use std::path::Path;

use globset::Glob;
use ignore::WalkBuilder;

use crate::indexer::types::{
    IndexerError,
    LocaleFile,
};
use crate::input::{
    detect_language_from_path,
    normalize_language_code,
};

/// Locales available in a translations directory.
#[derive(Clone, Debug, Default)]
pub struct LocaleIndexer {
    /// Found files, sorted by normalized locale then path.
    files: Vec<LocaleFile>,
}

impl LocaleIndexer {
    /// 翻訳ディレクトリを走査する
    ///
    /// `file_pattern` はディレクトリからの相対パスに対して照合する。
    /// ロケールを判定できないファイルは無視する。
    ///
    /// # Errors
    /// - ディレクトリが存在しない
    /// - 不正な glob パターン
    pub fn scan(dir: &Path, file_pattern: &str) -> Result<Self, IndexerError> {
        tracing::debug!(dir = %dir.display(), file_pattern, "Scanning translation files");

        if !dir.is_dir() {
            return Err(IndexerError::InvalidPath(dir.display().to_string()));
        }

        let matcher = Glob::new(file_pattern)
            .map_err(|e| IndexerError::InvalidPattern {
                pattern: file_pattern.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();

        let mut files = Vec::new();

        // ignore クレートでファイルを走査
        for result in WalkBuilder::new(dir)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let Ok(relative_path) = path.strip_prefix(dir) else {
                continue;
            };
            if !matcher.is_match(relative_path) {
                continue;
            }

            // ディレクトリ名からの判定は dir より下だけを見る
            let Some(locale) = detect_language_from_path(relative_path) else {
                tracing::debug!(path = %path.display(), "No locale in file name, skipping");
                continue;
            };

            files.push(LocaleFile { locale, path: path.to_path_buf() });
        }

        files.sort_by(|a, b| {
            normalize_language_code(&a.locale)
                .cmp(&normalize_language_code(&b.locale))
                .then_with(|| a.path.cmp(&b.path))
        });
        tracing::debug!(count = files.len(), "Found translation files");

        Ok(Self { files })
    }

    /// Every found file, sorted by locale.
    #[must_use]
    pub fn files(&self) -> &[LocaleFile] {
        &self.files
    }

    /// Distinct locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = Vec::new();
        for file in &self.files {
            if !locales.last().is_some_and(|last| file.matches(last)) {
                locales.push(file.locale.clone());
            }
        }
        locales
    }

    /// The file serving `locale`, matched ignoring case and `-`/`_`.
    ///
    /// When several files carry the same locale the first by path wins.
    #[must_use]
    pub fn find(&self, locale: &str) -> Option<&LocaleFile> {
        self.files.iter().find(|file| file.matches(locale))
    }
}
