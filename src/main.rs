// src/main.rs

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use preceptor::config::CONFIG;
use preceptor::llm::GeminiClient;
use preceptor::server::{create_optimized_pool, run_migrations, serve};
use preceptor::state::AppState;

#[derive(Parser)]
#[command(name = "preceptor", about = "Patient-interview training backend")]
struct Cli {
    /// Bind address, overrides PRECEPTOR_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides PRECEPTOR_PORT
    #[arg(long)]
    port: Option<u16>,

    /// SQLite connection string, overrides PRECEPTOR_DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    /// Migrations directory
    #[arg(long, default_value = "migrations")]
    migrations: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&CONFIG.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting preceptor");
    info!("Model: {}", CONFIG.model);

    let database_url = cli
        .database_url
        .unwrap_or_else(|| CONFIG.database_url.clone());
    let pool = create_optimized_pool(&database_url, CONFIG.sqlite_max_connections).await?;
    run_migrations(&pool, Path::new(&cli.migrations)).await?;

    let model = GeminiClient::new(
        CONFIG.gemini_api_key.clone(),
        CONFIG.gemini_base_url.clone(),
        CONFIG.model.clone(),
        CONFIG.model_timeout,
    )?;
    let state = AppState::new(pool, Arc::new(model));

    let host = cli.host.unwrap_or_else(|| CONFIG.host.clone());
    let port = cli.port.unwrap_or(CONFIG.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    serve(state, addr).await
}
