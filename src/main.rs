//! Taskdeck Server
//!
//! HTTP backend for a personal task manager: accounts, tasks with
//! subtasks and due dates, and completion analytics.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use taskdeck::api::{self, AppState};
use taskdeck::auth::AuthKeys;
use taskdeck::cli::{Cli, Command};
use taskdeck::config::{Config, DEFAULT_JWT_SECRET};
use taskdeck::db::Database;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Load configuration, then apply CLI overrides
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Serve) | None => run_server(config).await,
    }
}

/// Run the HTTP server
async fn run_server(config: Config) -> Result<()> {
    config.ensure_db_dir()?;

    info!("Starting taskdeck v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);
    info!("Port: {}", config.server.port);

    if config.server.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set TASKDECK_JWT_SECRET for production use");
    }

    let db = Database::open(&config.server.db_path)?;
    let db = Arc::new(db);

    info!("Database initialized successfully");

    let auth = AuthKeys::new(&config.server.jwt_secret, config.server.token_ttl_secs);
    let state = AppState::new(db, auth);

    api::serve(state, config.server.port).await
}
