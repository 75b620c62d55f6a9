//! Loading and writing the relay configuration file.
//!
//! The config is JSON. Every field has a serde default, so an empty object
//! (or no file at all) yields the compiled-in defaults. Any failure to read,
//! parse or validate an explicitly named file is an error: the caller is
//! expected to abort startup rather than run with a partial config.

use std::fs;
use std::path::Path;

use chatrelay_types::{ConfigError, RelayConfig};
use validator::Validate;

use crate::error::AppResult;

/// Command-line/environment values applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub address: Option<String>,
    pub port: Option<u16>,
}

/// Load, override and validate the configuration.
///
/// `None` for `path` means compiled defaults.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> AppResult<RelayConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            tracing::info!("No config file given, using built-in defaults");
            RelayConfig::default()
        }
    };

    if let Some(address) = &overrides.address {
        config.server.address = address.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    config.validate().map_err(|e| ConfigError::from_validation(&e))?;
    Ok(config)
}

/// Load and validate the configuration without overrides.
pub fn load_config(path: Option<&Path>) -> AppResult<RelayConfig> {
    resolve_config(path, &ConfigOverrides::default())
}

fn read_config_file(path: &Path) -> AppResult<RelayConfig> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError { path: path_str.clone(), message: e.to_string() })?;

    let config: RelayConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;

    tracing::info!(
        "Loaded config from {} ({} model mappings)",
        &path_str,
        config.model_mapping.len()
    );
    Ok(config)
}

/// Write `config` as pretty JSON. Refuses to replace an existing file unless `force`.
pub fn save_config(path: &Path, config: &RelayConfig, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path: path.display().to_string() }.into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::from_io_error(&e))?;
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::from_json_error(&e))?;
    fs::write(path, content).map_err(|e| ConfigError::from_io_error(&e))?;
    Ok(())
}
