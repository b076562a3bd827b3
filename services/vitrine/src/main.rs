//! Vitrine CLI
//!
//! Command-line interface for the project gallery dashboard service.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use vitrine::{load_config, Config};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Paginated project gallery dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Starting vitrine service");
    tracing::debug!(
        "Page size: {}, columns: {}, cache TTL: {}s",
        config.gallery.page_size,
        config.gallery.columns,
        config.gallery.cache_ttl_seconds
    );

    vitrine::run(config).await?;

    Ok(())
}
