//! Live token universe service - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Live token universe service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PULSE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    pulse_telemetry::init_logging()?;

    info!("Starting pulse live-universe service v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > PULSE_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("PULSE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = pulse_app::AppConfig::load_from(&config_path)?;
    info!(
        chain_id = %config.gateway_config().chain_id,
        port = config.server.port,
        "Configuration loaded"
    );

    let app = pulse_app::Application::new(config);
    app.run().await?;

    Ok(())
}
