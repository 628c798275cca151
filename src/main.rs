use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use studio_api::auth::GoTrueProvider;
use studio_api::config::AppConfig;
use studio_api::database::DatabaseManager;
use studio_api::AppState;

#[derive(Parser)]
#[command(name = "studio-api")]
#[command(about = "Studio API - session authentication and catalog reads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studio_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Studio API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config
        .validate_identity()
        .context("identity provider is not configured")?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let identity = GoTrueProvider::new(
        &config.identity.supabase_url,
        config.identity.supabase_anon_key.clone(),
    )
    .context("failed to build identity provider client")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::postgres(config, pool.clone(), Arc::new(identity));
    let app = studio_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Studio API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(pool).await;
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = DatabaseManager::migrate(&pool).await;
    DatabaseManager::close(pool).await;
    result.context("migration failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
