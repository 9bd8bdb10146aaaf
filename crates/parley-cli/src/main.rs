use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use parley_avatar::{AvatarPresenter, StreamingAvatarClient};
use parley_engine::{Scorer, SessionStore};
use parley_provider::{GeminiProvider, ReplyProvider, StubProvider};
use parley_server::config::ServerConfig;
use parley_server::state::{AppState, VendorKeys};
use parley_server::sweep::spawn_expiry_sweep;

#[derive(Parser)]
#[command(name = "parley", version, about = "parley negotiation demo server")]
struct Cli {
    #[arg(
        long,
        default_value = "parley.yaml",
        help = "Path to the server config file (defaults apply if absent)"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the HTTP API server")]
    Start {
        #[arg(long, help = "Override the configured port")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_dir = PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "parley.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Start { port } => {
            let mut config = ServerConfig::load_or_default(&cli.config)?;
            if let Some(port) = port {
                config.bind = format!("0.0.0.0:{port}");
            }

            let keys = VendorKeys {
                generative_text: env_key("GEMINI_API_KEY"),
                avatar: env_key("HEYGEN_API_KEY"),
            };

            let replies: Arc<dyn ReplyProvider> = match &keys.generative_text {
                Some(key) => Arc::new(
                    GeminiProvider::new(key.clone()).with_model(config.gemini_model.clone()),
                ),
                None => {
                    tracing::warn!("GEMINI_API_KEY not set; replies come from the canned roster");
                    Arc::new(StubProvider)
                }
            };

            let presenter: Option<Arc<dyn AvatarPresenter>> = keys
                .avatar
                .as_ref()
                .map(|key| {
                    Arc::new(StreamingAvatarClient::new(key.clone())) as Arc<dyn AvatarPresenter>
                });
            if presenter.is_none() {
                tracing::info!("HEYGEN_API_KEY not set; avatar presentation disabled");
            }

            let store = Arc::new(SessionStore::new(config.session.clone()));
            let state = AppState::new(
                store,
                Scorer::new(config.weights.clone()),
                replies,
                presenter,
                keys,
            );

            spawn_expiry_sweep(
                state.clone(),
                Duration::from_secs(config.sweep_interval_secs),
            );

            parley_server::serve(state, &config.bind).await
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
