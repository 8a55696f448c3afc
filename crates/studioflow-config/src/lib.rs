pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 設定ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STUDIOFLOW_CONFIG";
pub const CALLBACK_DELAY_ENV: &str = "STUDIOFLOW_CALLBACK_DELAY_SECONDS";
pub const MAX_ATTEMPTS_ENV: &str = "STUDIOFLOW_MAX_ATTEMPTS";

/// StudioFlowの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// `InProgress` イベントに載せる再呼び出しまでの待機秒数
    #[serde(default = "default_callback_delay_seconds")]
    pub callback_delay_seconds: u32,

    /// ドライバーの最大呼び出し回数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// `RUST_LOG` 未設定時のログレベル
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// インメモリサービスの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// 遷移中の状態に留まるポーリング回数
    #[serde(default = "default_settle_after_polls")]
    pub settle_after_polls: u32,
}

fn default_callback_delay_seconds() -> u32 {
    5
}

fn default_max_attempts() -> u32 {
    360
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_settle_after_polls() -> u32 {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            callback_delay_seconds: default_callback_delay_seconds(),
            max_attempts: default_max_attempts(),
            log_level: default_log_level(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            settle_after_polls: default_settle_after_polls(),
        }
    }
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STUDIOFLOW_CONFIG (直接パス指定)
/// 2. カレントディレクトリ: studioflow.local.yaml, studioflow.yaml
/// 3. ~/.config/studioflow/config.yaml (グローバル設定)
pub fn find_settings_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in ["studioflow.local.yaml", "studioflow.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("studioflow").join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 設定を読み込む
///
/// 設定ファイルがなければデフォルト値を使い、最後に環境変数で上書きする。
pub fn load_settings() -> Result<Settings> {
    let settings = match find_settings_file()? {
        Some(path) => load_from_path(&path)?,
        None => {
            debug!("設定ファイルなし、デフォルト設定を使用");
            Settings::default()
        }
    };
    apply_env_overrides(settings)
}

/// 指定したファイルから設定を読み込む (環境変数は適用しない)
pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    debug!("設定ファイルを読み込み: {}", path.display());

    // 空ファイルはすべてデフォルト
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// STUDIOFLOW_CALLBACK_DELAY_SECONDS / STUDIOFLOW_MAX_ATTEMPTS で上書き
pub fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
    if let Some(value) = env_u32(CALLBACK_DELAY_ENV)? {
        settings.callback_delay_seconds = value;
    }
    if let Some(value) = env_u32(MAX_ATTEMPTS_ENV)? {
        settings.max_attempts = value;
    }
    Ok(settings)
}

fn env_u32(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
