//! Configuration loader
//!
//! Reads the persisted target/token file and the runtime knobs.
//!
//! ## File Location
//! 1. `$SKIFF_HOME/.skiff/config.json`
//! 2. `$HOME/.skiff/config.json`
//!
//! A missing file is an empty (untargeted) config. The access token is stored
//! with a `bearer ` prefix and held without it in memory.
//!
//! ## Environment Variables
//! - `SKIFF_DIAL_TIMEOUT`: connect timeout in seconds
//! - `SKIFF_REQUEST_TIMEOUT`: read deadline in seconds
//! - `SKIFF_JOB_TIMEOUT`: overall job polling deadline in seconds
//! - `SKIFF_STAGING_TIMEOUT`: overall staging deadline in seconds
//! - `SKIFF_TRACE`: dump requests and responses at trace level (true/false)

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use skiff_domain::constants::BEARER_PREFIX;
use skiff_domain::{Config, Error, Result, Settings};
use tempfile::NamedTempFile;

const CONFIG_DIR: &str = ".skiff";
const CONFIG_FILE: &str = "config.json";

/// Path of the config file for this process.
///
/// # Errors
/// Returns `Error::Config` when neither `SKIFF_HOME` nor `HOME` is set.
pub fn config_path() -> Result<PathBuf> {
    config_path_from(|key| std::env::var(key).ok())
}

fn config_path_from(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    let home = lookup("SKIFF_HOME")
        .filter(|value| !value.is_empty())
        .or_else(|| lookup("HOME").filter(|value| !value.is_empty()))
        .ok_or_else(|| config_error("neither SKIFF_HOME nor HOME is set"))?;
    Ok(PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config from its default location.
pub fn load() -> Result<Config> {
    load_from_file(&config_path()?)
}

/// Load the config at `path`, treating a missing file as empty.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or is not valid JSON.
pub fn load_from_file(path: &Path) -> Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(config_error(format!("Failed to read config file: {}", e))),
    };

    tracing::debug!(path = %path.display(), "Loading configuration from file");
    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    let mut config: Config = serde_json::from_str(contents)
        .map_err(|e| config_error(format!("Invalid JSON format: {}", e)))?;
    config.access_token = strip_bearer(&config.access_token).to_string();
    Ok(config)
}

fn strip_bearer(token: &str) -> &str {
    match token.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => &token[BEARER_PREFIX.len()..],
        _ => token,
    }
}

/// Write `config` to `path` atomically.
///
/// The file is written to a temporary sibling and renamed over the target,
/// so a crash never leaves a truncated config behind.
pub fn save_to_file(config: &Config, path: &Path) -> Result<()> {
    let dir = path.parent().ok_or_else(|| config_error("config path has no parent directory"))?;
    std::fs::create_dir_all(dir)
        .map_err(|e| config_error(format!("Failed to create config directory: {}", e)))?;

    let mut persisted = config.clone();
    if !persisted.access_token.is_empty() {
        persisted.access_token = format!("{BEARER_PREFIX}{}", persisted.access_token);
    }
    let json = serde_json::to_vec_pretty(&persisted)
        .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))?;

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| config_error(format!("Failed to create temp file: {}", e)))?;
    file.write_all(&json)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| config_error(format!("Failed to write config file: {}", e)))?;
    file.persist(path).map_err(|e| config_error(format!("Failed to replace config file: {}", e)))?;

    tracing::debug!(path = %path.display(), "Configuration saved");
    Ok(())
}

/// Runtime settings from the environment, with defaults for unset variables.
///
/// # Errors
/// Returns `Error::Config` if a variable is set to an unparsable value.
pub fn load_settings() -> Result<Settings> {
    settings_from(|key| std::env::var(key).ok())
}

fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let defaults = Settings::default();
    Ok(Settings {
        dial_timeout: env_secs(&lookup, "SKIFF_DIAL_TIMEOUT", defaults.dial_timeout)?,
        request_timeout: env_secs(&lookup, "SKIFF_REQUEST_TIMEOUT", defaults.request_timeout)?,
        job_timeout: env_secs(&lookup, "SKIFF_JOB_TIMEOUT", defaults.job_timeout)?,
        staging_timeout: env_secs(&lookup, "SKIFF_STAGING_TIMEOUT", defaults.staging_timeout)?,
        trace: env_bool(&lookup, "SKIFF_TRACE", defaults.trace),
    })
}

fn env_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| config_error(format!("Invalid {}: {}", key, e))),
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config { message: message.into() }
}
