//! resmgr server binary.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default socket
//! resmgr-server
//!
//! # Verbose connection logging on a custom socket
//! resmgr-server -v --socket /run/resmgr.sock
//!
//! # Talk to it
//! nc -U /tmp/example_resmgr.sock
//! ```

use std::path::PathBuf;

use clap::Parser;
use resmgr_core::DEFAULT_CAPACITY;
use resmgr_server::{DEFAULT_SOCKET_PATH, Server, ServerConfig};
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Shared device broker over a Unix socket
#[derive(Parser, Debug)]
#[command(name = "resmgr-server")]
#[command(about = "Serve a shared in-memory device to local clients")]
#[command(version)]
struct Args {
    /// Path of the listening socket
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Device buffer capacity in bytes
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Log connection open/close events (same as --log-level debug)
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { args.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("resmgr server starting");

    let config = ServerConfig { socket_path: args.socket, capacity: args.capacity };
    let server = Server::bind(config)?;

    let reason = server.run_until(shutdown_signal()).await;
    tracing::info!("Shutting down ({:?})", reason);

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
