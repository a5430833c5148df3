//! lodestone CLI - database-backed service runner
//!
//! Subcommands:
//! - `serve`: start the connection manager and serve the HTTP API
//! - `check`: verify the database answers, then exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod settings;
mod tracing_setup;

use commands::check::{run_check, CheckArgs};
use commands::serve::{run_serve, ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "lodestone",
    author,
    version,
    about = "Postgres connection lifecycle and health service",
    long_about = "Runs a pooled Postgres connection manager behind a small HTTP API. \
                  Configuration is read from the environment and an optional .env file."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Check that the database is reachable
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Check(args) => run_check(args).await,
    }
}
