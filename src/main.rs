use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use studio_booking::config::AppConfig;
use studio_booking::logging::init_logging;
use studio_booking::server::{self, AppState};
use studio_booking::service::BookingService;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overrides configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    let log_level = config.get_log_level();
    let _log_guard = init_logging(
        Some(&log_level),
        &config.logging.format,
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        business = %config.business.name,
        "Starting booking service"
    );

    if config.admin.token.is_none() {
        warn!("No admin token configured; admin routes are open to anyone");
    }

    let service = BookingService::connect(&config.storage).await;
    info!(backend = service.active_backend(), "Storage ready");

    server::serve(AppState::new(service, config)).await
}
