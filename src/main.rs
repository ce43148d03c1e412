use anyhow::{Context, Result};
use clap::Parser;
use manubot_catalog::config::{find_config_file, load_config};
use manubot_catalog::pipeline;
use manubot_catalog::sources::ResolverRegistry;
use manubot_catalog::thumbnail::HtmlThumbnails;
use manubot_catalog::utils::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Manubot Catalog - Enrich a catalog of manuscripts with citation metadata
#[derive(Parser, Debug)]
#[command(name = "manubot-catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Enrich a YAML catalog of manuscripts with CSL metadata and write it as JSON", long_about = None)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input catalog (YAML); overrides the configured path
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output catalog (JSON); overrides the configured path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in the working directory
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("manubot_catalog={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let registry = ResolverRegistry::new(&config).context("Failed to build HTTP client")?;
    let thumbnails = HtmlThumbnails::new(HttpClient::from_config(&config.http)?);

    let summary = pipeline::run(&config, Arc::new(registry), Arc::new(thumbnails)).await?;

    tracing::info!(
        "Wrote {} records to {} ({} warnings)",
        summary.records,
        summary.output_path.display(),
        summary.warnings.len()
    );

    Ok(())
}
