use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use chatrelay_core::modules::config::{self as core_config, ConfigOverrides};
use chatrelay_types::RelayConfig;

use crate::cli::ConfigCommands;

pub fn handle_config_command(
    cmd: ConfigCommands,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => show_config(config_path, overrides, json),
        ConfigCommands::Init { path, force } => init_config(&path, force),
    }
}

pub fn show_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    json: bool,
) -> Result<()> {
    let config = core_config::resolve_config(config_path, overrides)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", render_config(&config));
    }
    Ok(())
}

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    core_config::save_config(path, &RelayConfig::default(), force)?;
    println!("{} Default config written to {}", "✓".green(), path.display());
    Ok(())
}

fn render_config(config: &RelayConfig) -> String {
    let timeout = config
        .upstream
        .request_timeout_secs
        .map_or_else(|| "none".to_string(), |s| format!("{}s", s));

    let mut out = String::new();
    out.push_str(&format!("{}\n", "Relay Configuration:".cyan().bold()));
    out.push_str(&format!("  Listen: {}\n", config.server.socket_addr()));
    out.push_str(&format!("  Shutdown grace: {}s\n", config.server.shutdown_grace_secs));
    out.push_str(&format!("  Upstream: {}\n", config.upstream.url));
    out.push_str(&format!("  Timeout: {}\n", timeout));
    if let Some(proxy) = &config.upstream.proxy_url {
        out.push_str(&format!("  Egress proxy: {}\n", proxy));
    }
    out.push_str(&format!("  Model Mappings: {}\n", config.model_mapping.len()));

    let mut mappings: Vec<_> = config.model_mapping.iter().collect();
    mappings.sort();
    for (from, to) in mappings {
        out.push_str(&format!("    {} -> {}\n", from, to));
    }
    out
}
