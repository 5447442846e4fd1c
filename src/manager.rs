//! 有効なカタログの管理と実行時のロケール切り替え
//!
//! 有効なカタログはロックの内側にある `Arc<StringCatalog>` で、ロックは
//! `Arc` の複製か差し替えの間だけ保持する。読み手は複製したスナップショットを
//! 使い続けるので、切り替え中に 2 つのロケールが混ざって見えることはない。
//! カタログは完全に読み込めてから設置し、失敗すれば以前のものが残る。

use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use thiserror::Error;

use crate::catalog::{
    LookupMode,
    StringCatalog,
};
use crate::config::{
    CatalogSettings,
    ConfigManager,
};
use crate::format::format;
use crate::indexer::{
    IndexerError,
    LocaleIndexer,
};
use crate::input::{
    LoadError,
    ParseError,
    fill_language,
    normalize_language_code,
    parse_ts_bytes,
};

/// ロケール切り替えの失敗
///
/// 以前のカタログは設置されたまま残る。
#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("No translation file for locale '{0}'")]
    UnknownLocale(String),

    #[error("Failed to scan translation files: {0}")]
    Indexer(#[from] IndexerError),

    #[error("Failed to load '{}': {source}", path.display())]
    Load { path: PathBuf, source: LoadError },

    #[error("Catalog loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// 現在のカタログと、それを設置したロケール
#[derive(Debug)]
struct Active {
    /// 呼び出し側が要求したロケール名
    locale: String,
    /// スナップショットを取った読み手と共有される
    catalog: Arc<StringCatalog>,
}

/// 有効な [`StringCatalog`] を保持し、ロケール変更時に差し替える
#[derive(Debug)]
pub struct CatalogManager {
    /// 作成時に渡された検証済みの設定
    settings: CatalogSettings,
    /// 解決済みの翻訳ディレクトリ
    translations_dir: PathBuf,
    /// 設定から決まる検索モード
    mode: LookupMode,
    /// 設置のたびに丸ごと差し替える
    active: RwLock<Active>,
}

impl CatalogManager {
    /// デフォルトロケールを提供するマネージャーを作成
    ///
    /// `settings` の `translations_dir` は `root` を基準に解決する。
    #[must_use]
    pub fn new(settings: CatalogSettings, root: &Path) -> Self {
        let translations_dir = root.join(&settings.translations_dir);
        Self::with_dir(settings, translations_dir)
    }

    /// 読み込み済みの設定からマネージャーを作成
    #[must_use]
    pub fn from_config(config: &ConfigManager) -> Self {
        Self::with_dir(config.get_settings().clone(), config.translations_dir())
    }

    /// 共通のコンストラクタ。デフォルトロケールの空カタログから始める
    fn with_dir(settings: CatalogSettings, translations_dir: PathBuf) -> Self {
        let locale = settings.default_locale.clone();
        let catalog = Arc::new(StringCatalog::empty(Some(locale.clone())));
        let mode = settings.lookup_mode();
        Self { settings, translations_dir, mode, active: RwLock::new(Active { locale, catalog }) }
    }

    #[must_use]
    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    #[must_use]
    pub fn translations_dir(&self) -> &Path {
        &self.translations_dir
    }

    /// 有効なカタログのスナップショット
    #[must_use]
    pub fn current(&self) -> Arc<StringCatalog> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner).catalog)
    }

    /// 有効なカタログのロケール
    #[must_use]
    pub fn current_locale(&self) -> String {
        self.active.read().unwrap_or_else(PoisonError::into_inner).locale.clone()
    }

    /// `catalog` を設置し、以前のカタログを返す
    ///
    /// ロケール名はカタログの言語、無ければデフォルトロケールになる。
    pub fn install(&self, catalog: StringCatalog) -> Arc<StringCatalog> {
        let locale =
            catalog.language().map_or_else(|| self.settings.default_locale.clone(), str::to_string);
        self.install_as(locale, Arc::new(catalog))
    }

    /// ロケール名とカタログを一度に差し替える
    fn install_as(&self, locale: String, catalog: Arc<StringCatalog>) -> Arc<StringCatalog> {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(from = %active.locale, to = %locale, entries = catalog.len(), "Installing catalog");
        active.locale = locale;
        std::mem::replace(&mut active.catalog, catalog)
    }

    /// `locale` が原文の言語（空カタログで提供する）かどうか
    #[must_use]
    pub fn is_default_locale(&self, locale: &str) -> bool {
        normalize_language_code(locale) == normalize_language_code(&self.settings.default_locale)
    }

    /// `locale` のカタログを読み込んで設置し、新しいカタログを返す
    ///
    /// # Errors
    /// `locale` のファイルが無いか読み込めない場合は [`SwitchError`]。
    /// 有効なカタログは変わらない。
    pub fn switch_locale(&self, locale: &str) -> Result<Arc<StringCatalog>, SwitchError> {
        tracing::debug!(locale, "Switching locale");

        let loaded = if self.is_default_locale(locale) {
            Ok(StringCatalog::empty(Some(locale.to_string())))
        } else {
            locate(&self.translations_dir, &self.settings.file_pattern, locale).and_then(|path| {
                StringCatalog::load_file(&path, &self.settings.load_options())
                    .map_err(|source| SwitchError::Load { path, source })
            })
        };

        self.finish_switch(locale, loaded)
    }

    /// [`switch_locale`](Self::switch_locale) の非同期版
    ///
    /// ファイルは `tokio::fs` で読み、解析はブロッキングプールで行う。
    /// 完了前に future を破棄しても有効なカタログは変わらない。
    ///
    /// # Errors
    /// [`switch_locale`](Self::switch_locale) と同じ。加えて、ブロッキング
    /// タスクが panic した場合は [`SwitchError::Task`]。
    pub async fn switch_locale_async(&self, locale: &str) -> Result<Arc<StringCatalog>, SwitchError> {
        tracing::debug!(locale, "Switching locale");

        let loaded = if self.is_default_locale(locale) {
            Ok(StringCatalog::empty(Some(locale.to_string())))
        } else {
            self.load_async(locale).await
        };

        self.finish_switch(locale, loaded)
    }

    /// 呼び出し元のスレッド外で `locale` のカタログを探して読み込む
    async fn load_async(&self, locale: &str) -> Result<StringCatalog, SwitchError> {
        let dir = self.translations_dir.clone();
        let pattern = self.settings.file_pattern.clone();
        let requested = locale.to_string();
        let path = tokio::task::spawn_blocking(move || locate(&dir, &pattern, &requested)).await??;

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SwitchError::Load { path: path.clone(), source: LoadError::Io(e) })?;

        let options = self.settings.load_options();
        let file_path = path.clone();
        let parsed = tokio::task::spawn_blocking(move || {
            let mut document = parse_ts_bytes(&bytes)?;
            fill_language(&mut document, &file_path);
            Ok::<_, ParseError>(StringCatalog::from_document(document, &options))
        })
        .await?;

        parsed.map_err(|e| SwitchError::Load { path, source: LoadError::Parse(e) })
    }

    /// 読み込めたカタログを設置する。失敗はログに出して返す
    fn finish_switch(
        &self,
        locale: &str,
        loaded: Result<StringCatalog, SwitchError>,
    ) -> Result<Arc<StringCatalog>, SwitchError> {
        match loaded {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                self.install_as(locale.to_string(), Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(error) => {
                tracing::warn!(locale, %error, "Locale switch failed, keeping current catalog");
                Err(error)
            }
        }
    }

    /// 有効なカタログで翻訳する。見つからなければ `source` を返す
    #[must_use]
    pub fn tr(&self, context: &str, source: &str, disambiguation: Option<&str>) -> String {
        let catalog = self.current();
        catalog.lookup_with(context, source, disambiguation, self.mode).text_or(source).to_string()
    }

    /// [`tr`](Self::tr) の後にプレースホルダを置換する
    #[must_use]
    pub fn tr_args<S: AsRef<str>>(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        args: &[S],
    ) -> String {
        format(&self.tr(context, source, disambiguation), args)
    }

    /// 切り替え可能なロケール（デフォルトロケールを含む、ソート済み）
    ///
    /// # Errors
    /// 翻訳ディレクトリを走査できない場合は [`IndexerError`]
    pub fn available_locales(&self) -> Result<Vec<String>, IndexerError> {
        let indexer = LocaleIndexer::scan(&self.translations_dir, &self.settings.file_pattern)?;
        let mut locales = indexer.locales();
        if !locales.iter().any(|locale| self.is_default_locale(locale)) {
            locales.push(self.settings.default_locale.clone());
        }
        locales.sort_by_key(|locale| normalize_language_code(locale));
        Ok(locales)
    }
}

/// `locale` を提供する翻訳ファイルのパス
fn locate(dir: &Path, file_pattern: &str, locale: &str) -> Result<PathBuf, SwitchError> {
    let indexer = LocaleIndexer::scan(dir, file_pattern)?;
    indexer
        .find(locale)
        .map(|file| file.path.clone())
        .ok_or_else(|| SwitchError::UnknownLocale(locale.to_string()))
}
