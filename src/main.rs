use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nexguild_api::config::{self, StoreBackend};
use nexguild_api::database::{DatabaseManager, Store};
use nexguild_api::is_production;
use nexguild_api::routes;
use nexguild_api::state::AppState;

/// NexGuild API server
#[derive(Parser, Debug)]
#[command(name = "nexguild-api", version, about)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Document store backend: memory or postgres (overrides STORE_BACKEND)
    #[arg(long)]
    store: Option<StoreBackend>,

    /// Create tables and indexes, then exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nexguild_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(store) = args.store {
        config.server.store = store;
    }
    tracing::info!("Starting NexGuild API in {:?} mode", config.environment);

    if is_production!() && config.security.jwt_secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let store = match config.server.store {
        StoreBackend::Memory => {
            if args.migrate_only {
                anyhow::bail!("--migrate-only requires the postgres store");
            }
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Store::memory()
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to postgres")?;
            Store::migrate(&pool).await.context("failed to prepare collections")?;
            if args.migrate_only {
                tracing::info!("Migrations complete");
                DatabaseManager::close().await;
                return Ok(());
            }
            Store::postgres(pool)
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::new(config, store).context("invalid security configuration")?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("NexGuild API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    DatabaseManager::close().await;
    Ok(())
}
