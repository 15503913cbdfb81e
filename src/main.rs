//! HMRC fraud prevention header service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser ──form: fraud_prevention──▶ reverse proxy ──X-Forwarded-For──▶ ┌──────────────────────┐
//!                                                                          │ http (auth, handlers)│
//!                                                                          └──────────┬───────────┘
//!                                                                                     ▼
//!   config (TOML, hot reload) ─────────────────────────────────────────────▶ fraud::HeaderBuilder
//!                                                                                     │
//!   Browser ◀── JSON headers + Set-Cookie: Gov-Client-Device-ID ◀─────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mtd_fraud_headers::config::watcher::ConfigWatcher;
use mtd_fraud_headers::http::HttpServer;
use mtd_fraud_headers::lifecycle::startup::{load_startup_config, setup_warnings};
use mtd_fraud_headers::lifecycle::Shutdown;
use mtd_fraud_headers::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "mtd-fraud-headers")]
#[command(about = "HMRC fraud prevention header service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_startup_config(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "mtd-fraud-headers starting"
    );
    for warning in setup_warnings(&config) {
        tracing::warn!("{}", warning);
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = tokio::sync::mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    drop(watcher);
    tracing::info!("Shutdown complete");
    Ok(())
}
