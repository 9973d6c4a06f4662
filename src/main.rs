//! Todo API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ tower layers (request id, trace, timeout)
//!                         │
//!                         ├── /static/*  → ServeDir
//!                         │
//!                         ▼
//!                     routing::Router::dispatch
//!                         │  match_path → Scope → middleware chain
//!                         ▼
//!                     handlers (welcome, health, ui, todos)
//!                         │
//!                         ▼
//!                     Repository (memory | Postgres)
//! ```

use std::path::PathBuf;

use clap::Parser;

use todo_api::config::load_config;
use todo_api::http::{self, HttpServer};
use todo_api::lifecycle::{wait_for_signal, Shutdown};
use todo_api::observability::{logging, metrics};
use todo_api::todo::store;

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "Todo HTTP API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!("todo-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = ?config.storage.kind,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let repo = store::from_config(&config.storage)?;

    let listener = http::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signals = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signals.trigger();
    });

    let server = HttpServer::new(config, repo);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
