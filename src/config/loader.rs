//! Configuration loading from disk and the environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::StarterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Operator account id.
pub const ENV_ACCOUNT_ID: &str = "ACCOUNT_ID";
/// Operator ECDSA private key, hex.
pub const ENV_PRIVATE_KEY_HEX: &str = "PRIVATE_KEY_HEX";
/// Network name.
pub const ENV_NETWORK: &str = "NETWORK";
/// Dotenv file read when the command line names none.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {0} is not valid unicode")]
    Env(&'static str),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML document into a config; missing fields take defaults.
pub fn parse_config(content: &str) -> Result<StarterConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay operator and network settings from `lookup` (normally the process
/// environment). Set, non-empty variables replace file values.
pub fn apply_env<F>(config: &mut StarterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
{
    if let Some(account) = lookup(ENV_ACCOUNT_ID)? {
        config.operator.account_id = Some(account);
    }
    if let Some(key) = lookup(ENV_PRIVATE_KEY_HEX)? {
        config.operator.private_key_hex = Some(key);
    }
    if let Some(network) = lookup(ENV_NETWORK)? {
        config.network.name = network;
    }
    Ok(())
}

/// Read a variable from the process environment; empty counts as unset.
pub fn process_env(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::Env(name)),
    }
}

/// Variables from a dotenv file. A missing file yields none. The process
/// environment is left untouched.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };
    entries
        .map(|entry| entry.map_err(ConfigError::from))
        .collect()
}

/// Process environment first, then `file` values; empty counts as unset.
pub fn env_with_file(
    file: HashMap<String, String>,
) -> impl Fn(&'static str) -> Result<Option<String>, ConfigError> {
    move |name| match process_env(name)? {
        Some(value) => Ok(Some(value)),
        None => Ok(file
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)),
    }
}

/// Load configuration: optional TOML file, then environment overlay (process
/// variables, then `env_file`), then validation. `network_override` (from
/// the command line) beats all of them.
pub fn load_config(
    path: Option<&Path>,
    env_file: &Path,
    network_override: Option<&str>,
) -> Result<StarterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => StarterConfig::default(),
    };

    apply_env(&mut config, env_with_file(read_env_file(env_file)?))?;
    if let Some(network) = network_override {
        config.network.name = network.to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
