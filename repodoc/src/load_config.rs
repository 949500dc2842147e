//! `load_config` module: Loads the optional YAML config file and injects the two
//! credentials from the environment into a [`Config`].
//!
//! # Responsibilities
//! - Parse the user-supplied YAML file, if any, into the typed core [`Config`].
//!   Missing sections and keys take their defaults.
//! - Inject `GITHUB_TOKEN` and `OPENAI_API_KEY`; secrets never come from YAML.
//! - Produce clear diagnostics: every failure carries the offending path.
//!
//! Whether the credentials are actually present is checked by the caller
//! (see [`Config::require_credentials`]), so a config can be loaded and
//! inspected without them.

use anyhow::{Context, Result};
use repodoc_core::config::{Config, GITHUB_TOKEN_ENV, OPENAI_API_KEY_ENV};
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    config.github.token = secret_from_env(GITHUB_TOKEN_ENV);
    config.completion.api_key = secret_from_env(OPENAI_API_KEY_ENV);

    config.trace_loaded();
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = fs::read_to_string(path)
        .inspect_err(|e| error!(error = ?e, config_path = ?path, "Failed to read config file"))
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(&content)
        .inspect_err(|e| error!(error = ?e, config_path = ?path, "Failed to parse config YAML"))
        .with_context(|| format!("Failed to parse config YAML {}", path.display()))?;
    info!(config_path = ?path, "Parsed config YAML successfully");
    Ok(config)
}

fn secret_from_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            info!(var = name, "Credential found in env");
            Some(value.trim().to_string())
        }
        _ => {
            info!(var = name, "Credential not set");
            None
        }
    }
}
