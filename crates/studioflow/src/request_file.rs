//! リクエストファイルの読み込み

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use studioflow_cloud::ResourceHandlerRequest;
use studioflow_nimble::{LaunchProfile, StreamingImage, Studio, StudioComponent};

/// `invoke` に渡すリクエストファイル
///
/// JSON は YAML のサブセットなので、どちらの形式でも読める。
/// 実行ごとにインメモリサービスは空で始まるので、既存リソースへの
/// read / update / delete は Seed* で先に作成しておく。
/// 作成順は Seed → SeedStudioComponents → SeedStreamingImages → SeedLaunchProfiles。
/// ID は種別ごとの連番 (studio-1, sc-1, si-1, lp-1 ...) になる。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestFile {
    /// 呼び出し前にインメモリサービスへ作成しておくスタジオ
    #[serde(default)]
    pub seed: Vec<Studio>,

    /// スタジオの後に作成するスタジオコンポーネント
    #[serde(default)]
    pub seed_studio_components: Vec<StudioComponent>,

    /// スタジオの後に作成するストリーミングイメージ
    #[serde(default)]
    pub seed_streaming_images: Vec<StreamingImage>,

    /// 最後に作成する起動プロファイル
    #[serde(default)]
    pub seed_launch_profiles: Vec<LaunchProfile>,

    #[serde(default)]
    pub desired_resource_state: serde_yaml::Value,

    #[serde(default)]
    pub previous_resource_state: Option<serde_yaml::Value>,

    #[serde(default)]
    pub next_token: Option<String>,
}

impl RequestFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("リクエストファイルを読み込めません: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("リクエストファイルの解析に失敗しました: {}", path.display()))
    }

    /// 種別ごとのモデル型でハンドラーリクエストを組み立てる
    pub fn to_request<M: DeserializeOwned>(
        &self,
        client_request_token: &str,
    ) -> anyhow::Result<ResourceHandlerRequest<M>> {
        let desired = model_from(&self.desired_resource_state)
            .context("DesiredResourceState がこの種別のモデルとして不正です")?;
        let mut request = ResourceHandlerRequest::new(client_request_token, desired)
            .with_next_token(self.next_token.clone());

        if let Some(previous) = &self.previous_resource_state {
            let previous = model_from(previous)
                .context("PreviousResourceState がこの種別のモデルとして不正です")?;
            request = request.with_previous(previous);
        }
        Ok(request)
    }
}

/// 未指定 (null) は空のモデル
fn model_from<M: DeserializeOwned>(value: &serde_yaml::Value) -> serde_yaml::Result<M> {
    if value.is_null() {
        serde_yaml::from_value(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()))
    } else {
        serde_yaml::from_value(value.clone())
    }
}
