//! Signalpost - signal-post ingestion and multi-channel publishing bot.
//!
//! Reads tagged fragments from the watched channel, assembles them into posts
//! and fans them out to every configured channel.

use clap::Parser;
use signalpost_bot::{
    ApiState, BotConfig, BotEvent, BotMetrics, Coordinator, Scheduler, Services, SettingsStore,
    create_router,
};
use signalpost_database::{PostgresRepository, build_pool, run_migrations};
use signalpost_models::{ChatClient, ChatClientConfig, OpenAiTextService, PromptTemplates};
use signalpost_telegram::{TelegramClient, TelegramConfig, UpdatePoller};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(name = "signalpost")]
#[command(about = "Signal post ingestion, moderation and publishing bot")]
#[command(version)]
struct Args {
    /// Path to the bot configuration file
    #[arg(short, long, default_value = "signalpost.toml")]
    config: PathBuf,

    /// Path to the persisted settings record
    #[arg(long, env = "SIGNALPOST_SETTINGS", default_value = "state.json")]
    settings: PathBuf,

    /// Bot API token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_token: String,

    /// Chat completion API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Maximum database connections
    #[arg(long, default_value_t = 4)]
    pool_size: u32,

    /// Serve /health and /metrics on this address
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting signalpost");
    info!(config_file = ?args.config, "Loading configuration");
    let config = Arc::new(BotConfig::from_file(&args.config)?);
    info!(channels = config.channels.len(), "Configuration loaded");

    let pool = build_pool(&args.database_url, args.pool_size)?;
    run_migrations(&pool)?;
    let repository = Arc::new(PostgresRepository::new(pool));

    let telegram_config = TelegramConfig::new(args.telegram_token)
        .with_api_base_url(config.telegram.api_base_url.clone());
    let telegram = TelegramClient::new(telegram_config);
    telegram.delete_webhook(true).await?;

    let chat_config = ChatClientConfig::new(&config.generation.base_url, &config.generation.model)
        .with_api_key(args.openai_api_key);
    let prompts = PromptTemplates::new(
        &config.generation.generate_prompt,
        &config.generation.translate_prompt,
    );
    let text_service = Arc::new(OpenAiTextService::new(ChatClient::new(chat_config), prompts));

    let services = Services::new(
        Arc::new(telegram.clone()),
        text_service.clone(),
        text_service,
        repository,
    );

    let settings = SettingsStore::load(&args.settings).await?;
    info!(settings = ?settings.settings(), "Settings loaded");

    let metrics = BotMetrics::new();
    let coordinator = Coordinator::new(services, Arc::clone(&config), settings, metrics.clone());
    let scheduler = Scheduler::new(&config.schedule)?;

    let (tx, rx) = mpsc::channel::<BotEvent>(256);
    let poller = UpdatePoller::new(telegram, config.telegram.poll_timeout_secs);
    tokio::spawn(poller.run(tx.clone()));
    let timers = scheduler.spawn(tx);

    if let Some(addr) = args.metrics_addr {
        let router = create_router(ApiState::new(metrics));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "Metrics API listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "Metrics API stopped");
            }
        });
    }

    tokio::select! {
        _ = coordinator.run(rx) => warn!("Event stream ended"),
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
        }
    }

    for timer in timers {
        timer.abort();
    }
    info!("Signalpost stopped");
    Ok(())
}
