//! chatrelay - Headless Daemon
//!
//! Accepts `POST /chat/completions`, rewrites `model` through the configured
//! mapping and forwards the request to one fixed upstream, relaying the raw
//! response body back.
//!
//! Default listen address: http://127.0.0.1:9998

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod config_commands;
mod server_utils;

use chatrelay_core::modules::config::{self as core_config, ConfigOverrides};
use chatrelay_core::proxy::{build_router, AppState};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli { command, config, host, port, log_level } = Cli::parse();

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let overrides = ConfigOverrides { address: host, port };

    match command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config.as_deref(), &overrides).await,
        Commands::Config(cmd) => {
            config_commands::handle_config_command(cmd, config.as_deref(), &overrides)
        }
    }
}

async fn serve(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<()> {
    let config = core_config::resolve_config(config_path, overrides)
        .context("Failed to load configuration")?;

    let addr = config.server.socket_addr();
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    info!("Upstream: {}", config.upstream.url);
    info!("{} model mappings loaded", config.model_mapping.len());
    match config.upstream.request_timeout_secs {
        Some(secs) => info!("Upstream timeout: {}s", secs),
        None => info!("Upstream timeout: none"),
    }

    let state = AppState::new(config).context("Failed to build upstream client")?;
    let app = build_router(state);

    let listener = server_utils::create_listener(&addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    server_utils::serve_until(listener, app, server_utils::shutdown_signal(), grace).await?;

    info!("Server stopped");
    Ok(())
}
