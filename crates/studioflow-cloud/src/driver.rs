//! ローカル再呼び出しドライバー
//!
//! リコンシリエーションエンジンの代わりに、`InProgress` が返る間
//! ハンドラーを再呼び出しします。試行回数の上限を持つのはここだけです。

use crate::context::CallbackContext;
use crate::error::HandlerError;
use crate::event::{Action, OperationStatus, ProgressEvent};
use crate::handler::ResourceHandler;
use crate::request::ResourceHandlerRequest;
use crate::resource::ResourceKind;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// ドライバー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveOptions {
    /// ハンドラー呼び出しの最大回数
    pub max_attempts: u32,

    /// `callback_delay_seconds` だけ待機するか
    pub honor_delay: bool,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            max_attempts: 360,
            honor_delay: true,
        }
    }
}

/// 一連の呼び出し結果
#[derive(Debug, Clone)]
pub struct DriveReport<M> {
    /// 呼び出しごとのイベント（最後が最終結果）
    pub events: Vec<ProgressEvent<M>>,
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl<M> DriveReport<M> {
    pub fn last(&self) -> Option<&ProgressEvent<M>> {
        self.events.last()
    }

    pub fn succeeded(&self) -> bool {
        self.last()
            .is_some_and(|event| event.status == OperationStatus::Success)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// 終端状態になるまでハンドラーを再呼び出し
///
/// `InProgress` のたびに返されたモデルとコンテキストを次の呼び出しへ渡す。
/// `max_attempts` を超えた場合は `GeneralServiceError` のイベントで終了する。
pub async fn drive<K: ResourceKind>(
    handler: &ResourceHandler<K>,
    action: Action,
    mut request: ResourceHandlerRequest<K::Model>,
    options: &DriveOptions,
) -> DriveReport<K::Model> {
    let started_at = Utc::now();
    let mut context = CallbackContext::new();
    let mut events = Vec::new();
    let mut attempts = 0;

    loop {
        if attempts >= options.max_attempts {
            let err = HandlerError::GeneralServiceError(format!(
                "stabilization did not complete within {} attempts",
                options.max_attempts
            ));
            warn!("{} {} gave up: {}", handler.type_name(), action, err);
            events.push(ProgressEvent::failed(&err));
            break;
        }

        attempts += 1;
        let event = handler.handle(action, &request, context.clone()).await;
        debug!(
            "{} {} attempt {}: {}",
            handler.type_name(),
            action,
            attempts,
            event.status
        );

        if event.is_terminal() {
            events.push(event);
            break;
        }

        if let Some(model) = &event.resource_model {
            request.desired_resource_state = model.clone();
        }
        context = event.callback_context.clone().unwrap_or_default();
        let delay = event.callback_delay_seconds.unwrap_or(0);
        events.push(event);

        // 最後の試行でなければ待機
        if options.honor_delay && attempts < options.max_attempts && delay > 0 {
            sleep(Duration::from_secs(delay)).await;
        }
    }

    DriveReport {
        events,
        attempts,
        started_at,
        finished_at: Utc::now(),
    }
}
