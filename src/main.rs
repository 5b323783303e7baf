//! County Atlas Server
//!
//! Run with: cargo run --bin county-atlas -- --config config.toml
//!
//! # Configuration
//!
//! Settings come from the `--config` file, else the first of
//! `~/.config/county-atlas/config.toml`, `/etc/county-atlas/config.toml` and
//! `./config.toml`, else the built-in defaults. Environment variables
//! override the file:
//! - `COUNTY_ATLAS_HOST`, `COUNTY_ATLAS_PORT`: Bind address (default: 127.0.0.1:8050)
//! - `COUNTY_ATLAS_DATA_DIR`: Directory holding the dataset CSV files
//! - `COUNTY_ATLAS_GEOJSON_URL`, `COUNTY_ATLAS_GEOJSON_PATH`: Boundary document
//! - `COUNTY_ATLAS_LOG_LEVEL`, `COUNTY_ATLAS_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter, overrides the configured level

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use county_atlas::api::{serve, AppState};
use county_atlas::config::Config;
use county_atlas::dashboard::load_context;
use county_atlas::logging::init_logging;

#[derive(Parser)]
#[command(name = "county-atlas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive county-level dashboard of education spending and health outcomes")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = args.config.clone().or_else(Config::default_path);
    let mut config = Config::load_from(source.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", source))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.server.debug |= args.debug;

    init_logging(&config.logging, config.server.debug)?;

    tracing::info!("Starting County Atlas v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Data directory: {:?}", config.data.dir);

    let context = match load_context(&config).await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard data");
            return Err(e).context("Failed to load dashboard data");
        }
    };

    serve(AppState::new(context), &config.server).await?;

    Ok(())
}
