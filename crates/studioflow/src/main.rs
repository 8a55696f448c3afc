mod commands;
mod request_file;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studioflow_cloud::Action;
use studioflow_nimble::ResourceType;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studioflow")]
#[command(
    about = "Nimble Studio リソースのライフサイクルを、完了までローカルで駆動する",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ハンドラーを呼び出し、終端状態になるまで再呼び出しする
    Invoke {
        /// リソース種別 (studio, studio-component, launch-profile, streaming-image)
        kind: ResourceType,
        /// アクション (create, read, update, delete, list)
        action: Action,
        /// リクエストファイル (YAML または JSON)。既存リソースは Seed / SeedStudioComponents /
        /// SeedStreamingImages / SeedLaunchProfiles で事前に作成する
        #[arg(short, long)]
        request: PathBuf,
        /// クライアントリクエストトークン（省略時は自動生成）
        #[arg(short, long)]
        token: Option<String>,
        /// 最初の呼び出し結果だけを表示する
        #[arg(long)]
        no_wait: bool,
    },
    /// 対応しているリソース種別を表示
    Kinds,
    /// 有効な設定を表示
    Config,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("studioflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = studioflow_config::load_settings()?;

    // RUST_LOG 未設定なら設定ファイルのログレベルを使う
    // stdoutはイベントのJSON出力に使うので、ログはstderrへ
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Invoke {
            kind,
            action,
            request,
            token,
            no_wait,
        } => {
            commands::invoke::handle(
                &settings,
                commands::invoke::InvokeArgs {
                    kind,
                    action,
                    request,
                    token,
                    no_wait,
                },
            )
            .await?;
        }
        Commands::Kinds => {
            commands::kinds::handle();
        }
        Commands::Config => {
            commands::config::handle(&settings)?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
