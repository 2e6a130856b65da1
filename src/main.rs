//! Suburb data proxy.
//!
//! Serves a landing page and a small JSON API that forwards to the
//! Microburbs report-generator API with the bearer token attached.
//!
//! ```text
//!   browser ──▶ /api/* ──▶ handlers ──▶ upstream client ──▶ Microburbs API
//!      ▲                                      │
//!      └──── 200 + JSON envelope ◀── sanitize ┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use suburb_proxy::config::loader::{default_config, load_config};
use suburb_proxy::observability::{logging, metrics};
use suburb_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "suburb-proxy")]
#[command(about = "Proxy for the Microburbs suburb and property API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("suburb-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
