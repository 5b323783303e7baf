//! County Atlas CLI
//!
//! Offline commands against the configured data:
//! - Validate that every input loads
//! - Print a regression summary
//! - Export a map figure
//! - Print a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use county_atlas::config::{generate_default_config, Config};
use county_atlas::dashboard::{load_context, DashboardContext};
use county_atlas::logging::init_logging;

#[derive(Parser)]
#[command(name = "county-atlas-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline tools for the County Atlas dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every input and report what was found
    Check,

    /// Print the regression summary for a comparison dataset
    Summary {
        /// Dataset on the y axis (default: the initial selection)
        #[arg(short, long)]
        y: Option<String>,
        /// Fit raw values instead of their logit
        #[arg(long)]
        no_logit: bool,
    },

    /// Write a map figure as JSON
    Map {
        /// Dataset display name
        name: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { output } = &cli.command {
        return write_output(output.as_ref(), &generate_default_config());
    }

    let source = cli.config.clone().or_else(Config::default_path);
    let config = Config::load_from(source.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", source))?;
    init_logging(&config.logging, cli.debug)?;

    let context = load_context(&config)
        .await
        .context("Failed to load dashboard data")?;

    match cli.command {
        Commands::Check => print_check(&context),
        Commands::Summary { y, no_logit } => {
            let name = y.unwrap_or_else(|| context.default_state().scatter_y.clone());
            let output = context.scatter(&name, !no_logit)?;
            println!("{}", output.summary);
            println!();
            println!(
                "joined: {}  observations: {}  excluded: {}",
                output.joined, output.observations, output.excluded
            );
        }
        Commands::Map { name, output } => {
            let figure = context.map(&name)?;
            let json = serde_json::to_string_pretty(figure.as_ref())?;
            write_output(output.as_ref(), &json)?;
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

fn print_check(context: &DashboardContext) {
    println!("Datasets:");
    for dataset in context.catalog().iter() {
        let mapped = context
            .map(dataset.name())
            .ok()
            .and_then(|f| f.locations().map(|l| l.len()))
            .unwrap_or(0);
        println!(
            "  {:<45} {:>6} records {:>6} mapped  {:?}",
            dataset.name(),
            dataset.table.len(),
            mapped,
            dataset.meta.role
        );
    }
    println!();
    println!("Boundary features: {}", context.geo().feature_count());

    println!("Insights:");
    for name in context.scatter_options() {
        let status = match context.insight(&name) {
            Ok(text) => format!("{} chars", text.len()),
            Err(e) => e.to_string(),
        };
        println!("  {:<45} {}", name, status);
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            eprintln!("Wrote {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
