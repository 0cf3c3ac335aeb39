//! depot-hashes - recover file names and content hashes from depot manifests
//!
//! Entry point for the CLI.

mod cli;
mod config;
mod core;
mod util;

use clap::Parser;
use cli::Args;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose > 1 { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli::load_config(&args)?;
    tracing::debug!("Using configuration: {:?}", config);

    cli::run(&args, &config).await
}
