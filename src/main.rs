//! Worker relay (v1)
//!
//! An HTTP proxy that disguises every request it receives as a plain GET to
//! one of a fixed pool of worker hosts.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   WORKER RELAY                    │
//!                        │                                                   │
//!   Client request       │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│  relay   │───▶│load_balancer│  │
//!                        │  │ server  │    │ rewriter │◀───│ worker pool │  │
//!                        │  └─────────┘    └────┬─────┘    └─────────────┘  │
//!                        │                      │                            │
//!                        │                      ▼                            │
//!                        │                ┌──────────┐                       │
//!                        │                │  codec   │                       │
//!                        │                │ encoder  │                       │
//!                        │                └────┬─────┘                       │
//!                        │                     ▼                             │
//!   Client response      │  ┌─────────┐    ┌──────────┐                      │
//!   ◀────────────────────┼──│  http   │◀───│ forward  │◀─────────────────────┼── GET https://<worker>:443/?dieuri=…
//!                        │  └─────────┘    └──────────┘                      │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use worker_relay::config::load_config;
use worker_relay::http::{HttpServer, HttpsForwarder};
use worker_relay::lifecycle::{startup::build_rewriter, Shutdown};
use worker_relay::observability::{logging::init_logging, metrics::init_metrics};

#[derive(Parser)]
#[command(name = "worker-relay")]
#[command(about = "Relay HTTP requests through a rotating pool of workers", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "relay.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    init_logging(&config.observability.log_level);
    tracing::info!(config = %args.config.display(), "worker-relay v0.1.0 starting");

    let rewriter = build_rewriter(&config)?;
    let forwarder = Arc::new(HttpsForwarder::new(&config.timeouts)?);

    if config.observability.metrics_enabled {
        // Validated at load time.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, rewriter, forwarder);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
