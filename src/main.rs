use std::path::PathBuf;

use clap::Parser;
use keyrelay::api::{create_router, AppState};
use keyrelay::logging::init_logging;
use keyrelay::server::start_server;
use keyrelay::GatewayConfig;
use tracing::{info, warn};

/// Keyrelay - license-key registry and chat-webhook relay
#[derive(Parser)]
#[command(name = "keyrelay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_logging(&config.log_level, config.log_format);

    let state = AppState::from_config(&config)?;

    for channel in state.relay.missing_channels() {
        warn!(%channel, "{} not set; relay route will answer WEBHOOK_NOT_CONFIGURED", channel.env_var());
    }

    for view in state.registry.list()? {
        let marker = if view.is_lifetime { " (LIFETIME)" } else { "" };
        info!("Bootstrap key: {} [{}]{}", view.key, view.tier, marker);
    }

    let addr = config.socket_addr()?;
    start_server(create_router(state), addr).await?;

    Ok(())
}
