//! Database connectivity check
//!
//! Runs the same startup and shutdown hooks as `serve` without binding a
//! listener. Exits non-zero when the database does not answer.

use anyhow::{Context, Result};
use clap::Parser;
use lodestone_db::PgConnectionManager;
use lodestone_server::lifecycle;

use super::DatabaseArgs;
use crate::settings::Settings;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    args.database.apply(&mut settings);

    let database = settings
        .database_config()
        .context("Database is not configured")?;
    tracing::debug!(?database, "checking database");

    let manager = PgConnectionManager::new();
    lifecycle::on_startup(&manager, &database)
        .await
        .context("Database check failed")?;
    lifecycle::on_shutdown(&manager).await?;

    println!("database connected");
    Ok(())
}
