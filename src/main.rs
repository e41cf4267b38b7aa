//! # memhunt - memory inspection server
//!
//! Startup sequence for `memhunt serve`:
//!
//! 1. **Tracing** - env-filtered subscriber
//! 2. **Configuration** - TOML file (optional) plus CLI overrides
//! 3. **Heap registry** - optionally seeded with demo objects
//! 4. **Axum API** - serves until Ctrl+C, then drains in-flight requests

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

mod cli;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use memhunt_core::{HeapRegistry, MemoryReporter};
use memhunt_web::routes::ROUTES;

use crate::cli::{Cli, Commands, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Routes => {
            print_routes();
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_tracing();

    let config = args
        .resolve_config()
        .context("Failed to load server configuration")?;
    info!(
        bind = %config.bind_address,
        debug = config.debug,
        "memhunt starting"
    );

    let registry = HeapRegistry::new();
    let demo = demo::seed(&registry, args.demo_objects);
    if !demo.is_empty() {
        info!(objects = demo.len(), "Seeded heap registry with demo objects");
    }

    let span = info_span!("memory_reporter", bind = %config.bind_address);
    let reporter = MemoryReporter::new(registry.clone()).with_span(span);
    memhunt_web::server::run_server(config, reporter, wait_for_shutdown())
        .await
        .context("Web server failed")?;

    registry.close();
    info!("memhunt stopped gracefully");
    Ok(())
}

/// Initialize tracing subscriber with environment filter.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memhunt=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_routes() {
    let width = ROUTES.iter().map(|(path, _)| path.len()).max().unwrap_or(0);
    for (path, description) in ROUTES {
        println!("GET {path:<width$}  {description}");
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn wait_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }
}
