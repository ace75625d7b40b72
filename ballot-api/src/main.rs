//! ballot-api - Election tally service
//!
//! Opens the election database, then serves candidate, party, vote and tally
//! endpoints until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ballot_common::config::{
    load_service_config, resolve_database_path, ServiceConfig, DATABASE_ENV_VAR,
};
use ballot_common::{ElectionStore, VotePolicy};
use ballot_api::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ballot-api
#[derive(Parser, Debug)]
#[command(name = "ballot-api")]
#[command(about = "Election candidate, vote and tally service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "BALLOT_DATABASE")]
    database: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Reject a second ballot from the same voter
    #[arg(long)]
    one_vote_per_voter: bool,

    /// Have SQLite reject references to missing parties or candidates
    #[arg(long)]
    enforce_foreign_keys: bool,
}

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballot_api=debug,ballot_common=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting ballot-api v{}", env!("CARGO_PKG_VERSION"));

    let file_config = match &args.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            load_service_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => ServiceConfig::default(),
    };

    let mut store_config = file_config.store.clone();
    if args.one_vote_per_voter {
        store_config.vote_policy = VotePolicy::OneVotePerVoter;
    }
    if args.enforce_foreign_keys {
        store_config.enforce_foreign_keys = true;
    }

    let db_path = resolve_database_path(
        args.database.as_deref(),
        DATABASE_ENV_VAR,
        Some(&file_config),
    );
    info!("Database path: {}", db_path.display());

    let store = match ElectionStore::open(&db_path, store_config).await {
        Ok(store) => {
            info!("Connected to the election database");
            store
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port = args.port.or(file_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    // Bind only after the database is open
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
