use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use server::{AppState, serve};
use shared::config::load_config;
use shared::types::AppConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "server", version, about = "adboard authentication service")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        load_config(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config))?
    } else {
        warn!("Config file {} not found, using defaults", args.config);
        AppConfig::default()
    };

    let addr = config.server.addr();
    let state = AppState::from_config(config).await?;

    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tokio::select! {
        result = serve(listener, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
