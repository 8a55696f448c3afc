use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定ファイルの解析に失敗しました ({path}): {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("環境変数 {name} の値が不正です: {value:?}")]
    InvalidEnv { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
