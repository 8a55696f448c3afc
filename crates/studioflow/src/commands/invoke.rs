use crate::request_file::RequestFile;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use studioflow_cloud::{
    Action, CallbackContext, DriveOptions, HandlerSettings, OperationStatus, ProgressEvent,
    ResourceHandler, ResourceHandlerRequest, ResourceKind, drive,
};
use studioflow_config::Settings;
use studioflow_nimble::{
    InMemoryNimble, LaunchProfileResource, ResourceType, StreamingImageResource,
    StudioComponentResource, StudioResource,
};
use tracing::info;

pub struct InvokeArgs {
    pub kind: ResourceType,
    pub action: Action,
    pub request: PathBuf,
    pub token: Option<String>,
    pub no_wait: bool,
}

pub async fn handle(settings: &Settings, args: InvokeArgs) -> anyhow::Result<()> {
    let file = RequestFile::load(&args.request)?;
    let token = args
        .token
        .clone()
        .unwrap_or_else(|| format!("studioflow-{}", chrono::Utc::now().timestamp_millis()));

    let nimble = Arc::new(InMemoryNimble::with_settle_after_polls(
        settings.simulation.settle_after_polls,
    ));
    let handler_settings = HandlerSettings {
        callback_delay_seconds: u64::from(settings.callback_delay_seconds),
    };
    let options = DriveOptions {
        max_attempts: settings.max_attempts,
        honor_delay: true,
    };

    let seeding = Seeding { token: &token };
    seeding
        .run(StudioResource::new(nimble.clone()), &file.seed)
        .await?;
    seeding
        .run(
            StudioComponentResource::new(nimble.clone()),
            &file.seed_studio_components,
        )
        .await?;
    seeding
        .run(
            StreamingImageResource::new(nimble.clone()),
            &file.seed_streaming_images,
        )
        .await?;
    seeding
        .run(
            LaunchProfileResource::new(nimble.clone()),
            &file.seed_launch_profiles,
        )
        .await?;

    println!(
        "{} {} {}",
        "▶".green(),
        args.kind.type_name().cyan(),
        args.action.to_string().bold()
    );

    let invocation = Invocation {
        action: args.action,
        file: &file,
        token: &token,
        options,
        no_wait: args.no_wait,
    };
    match args.kind {
        ResourceType::Studio => {
            let kind = StudioResource::new(nimble.clone());
            invocation
                .run(ResourceHandler::with_settings(kind, handler_settings))
                .await
        }
        ResourceType::StudioComponent => {
            let kind = StudioComponentResource::new(nimble.clone());
            invocation
                .run(ResourceHandler::with_settings(kind, handler_settings))
                .await
        }
        ResourceType::LaunchProfile => {
            let kind = LaunchProfileResource::new(nimble.clone());
            invocation
                .run(ResourceHandler::with_settings(kind, handler_settings))
                .await
        }
        ResourceType::StreamingImage => {
            let kind = StreamingImageResource::new(nimble.clone());
            invocation
                .run(ResourceHandler::with_settings(kind, handler_settings))
                .await
        }
    }
}

/// Seed* のリソースを作成して READY まで進める（待機なし）
struct Seeding<'a> {
    token: &'a str,
}

impl Seeding<'_> {
    async fn run<K: ResourceKind>(&self, kind: K, models: &[K::Model]) -> anyhow::Result<()> {
        if models.is_empty() {
            return Ok(());
        }

        let handler = ResourceHandler::new(kind);
        let options = DriveOptions {
            honor_delay: false,
            ..DriveOptions::default()
        };
        let slug = handler.type_name().rsplit("::").next().unwrap_or_default();

        for (index, model) in models.iter().enumerate() {
            // 種別ごとにトークンを分ける
            let token = format!("{}-seed-{}-{}", self.token, slug, index);
            let request = ResourceHandlerRequest::new(token, model.clone());
            let report = drive(&handler, Action::Create, request, &options).await;
            let created = report
                .last()
                .filter(|_| report.succeeded())
                .and_then(|event| event.resource_model.as_ref());

            match created {
                Some(model) => {
                    let handle = handler.kind().handle(model);
                    info!("seeded {} {}", handler.type_name(), handle);
                    println!("{} {}", "✓ シード:".dimmed(), handle);
                }
                None => {
                    let message = report
                        .last()
                        .and_then(|event| event.message.clone())
                        .unwrap_or_default();
                    anyhow::bail!(
                        "シードの {} 作成に失敗しました: {}",
                        handler.type_name(),
                        message
                    );
                }
            }
        }
        Ok(())
    }
}

struct Invocation<'a> {
    action: Action,
    file: &'a RequestFile,
    token: &'a str,
    options: DriveOptions,
    no_wait: bool,
}

impl Invocation<'_> {
    async fn run<K: ResourceKind>(&self, handler: ResourceHandler<K>) -> anyhow::Result<()> {
        let request = self.file.to_request::<K::Model>(self.token)?;

        let events = if self.no_wait {
            vec![
                handler
                    .handle(self.action, &request, CallbackContext::new())
                    .await,
            ]
        } else {
            let report = drive(&handler, self.action, request, &self.options).await;
            println!(
                "{}",
                format!(
                    "{} 回の呼び出し ({} ms)",
                    report.attempts,
                    report.elapsed().num_milliseconds()
                )
                .dimmed()
            );
            report.events
        };

        for (index, event) in events.iter().enumerate() {
            print_event(index + 1, event)?;
        }

        match events.last() {
            Some(event) if event.status == OperationStatus::Failed => {
                anyhow::bail!(
                    "{} {} が失敗しました: {}",
                    handler.type_name(),
                    self.action,
                    event.message.as_deref().unwrap_or("-")
                )
            }
            _ => Ok(()),
        }
    }
}

fn print_event<M: serde::Serialize>(step: usize, event: &ProgressEvent<M>) -> anyhow::Result<()> {
    let status = match event.status {
        OperationStatus::InProgress => event.status.to_string().yellow(),
        OperationStatus::Success => event.status.to_string().green(),
        OperationStatus::Failed => event.status.to_string().red(),
    };
    println!("{} {}", format!("[{}]", step).dimmed(), status);
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}
