//! HTTP server command
//!
//! Runs the database startup hook, serves `/api/v1` until Ctrl+C/SIGTERM,
//! then runs the shutdown hook.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use lodestone_server::{serve, ServerConfig};

use super::DatabaseArgs;
use crate::settings::Settings;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides BIND_ADDR, default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    args.database.apply(&mut settings);
    tracing::debug!(?settings, "settings loaded");

    let database = settings
        .database_config()
        .context("Database is not configured")?;

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => settings.bind_addr()?,
    };

    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || settings.cors_permissive,
    };

    tracing::info!("Starting lodestone server on {}", config.bind_addr);

    // Blocks until shutdown
    serve(config, database).await.context("Server error")?;

    Ok(())
}
