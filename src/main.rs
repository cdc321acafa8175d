//! # NPR Lite server
//!
//! ## Usage
//!
//! ```sh
//! RUST_LOG=npr_lite=debug npr_lite --listen 127.0.0.1:8080
//! ```

use clap::Parser;
use npr_lite::cli::Cli;
use npr_lite::pages::Lite;
use npr_lite::server;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "npr_lite starting up");

    let args = Cli::parse();
    tracing::debug!(?args, "Parsed CLI arguments");

    let config = args.config().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    let registry = args
        .registry()
        .inspect_err(|e| error!(error = %e, "Could not load categories"))?;
    info!(
        categories = registry.iter().count(),
        publisher = %config.publisher_host,
        "Configuration loaded"
    );

    let listen = config.listen;
    let lite = Arc::new(Lite::new(config, Arc::new(registry))?);
    server::serve(lite, listen).await?;
    Ok(())
}
