//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    CatalogSettings,
    ConfigError,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: CatalogSettings,

    /// アプリケーションのルートパス
    root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: CatalogSettings::default(), root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `root` - アプリケーションのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー（現在の設定は変更されない）
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for root: {:?}", root);

        let settings = if let Some(root) = &root {
            loader::load_from_root(root)?.map_or_else(CatalogSettings::default, |loaded| {
                tracing::debug!("Loaded settings file: {:?}", loaded);
                loaded
            })
        } else {
            CatalogSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.root = root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.current_settings
    }

    /// ルートパスを取得
    #[must_use]
    pub const fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }

    /// 翻訳ファイルのディレクトリ（ルートからの相対パスを解決済み）
    #[must_use]
    pub fn translations_dir(&self) -> PathBuf {
        self.root.as_ref().map_or_else(
            || PathBuf::from(&self.current_settings.translations_dir),
            |root| root.join(&self.current_settings.translations_dir),
        )
    }
}
