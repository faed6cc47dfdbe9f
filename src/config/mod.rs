mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `.env`, the YAML config file and environment overrides, then
/// validates the result. Called once at startup.
pub async fn load() -> Result<Config> {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();

    let explicit_path = env::var("CONFIG_PATH").ok();
    let mut config = load_file(explicit_path.as_deref()).await?;
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Reads the YAML file at `path`, or at `config.yaml` when `path` is `None`.
/// Only the implicit default file may be absent.
pub async fn load_file(path: Option<&str>) -> Result<Config> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    debug!("Loading configuration from: {}", config_path);

    let config_str = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound && path.is_none() => {
            debug!("No {} found, using defaults", config_path);
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(Error::config(format!(
                "Failed to read {}: {}",
                config_path, e
            )));
        }
    };

    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(&config_str)?;
    Ok(config)
}

/// Applies `GEMINI_API_KEY`, `GEMINI_MODEL`, `PORT` and `UPLOAD_FOLDER`
/// on top of the file values.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup("GEMINI_API_KEY") {
        config.llm.api_key = api_key;
    }
    if let Some(model) = lookup("GEMINI_MODEL") {
        config.llm.model = model;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }
    if let Some(upload_dir) = lookup("UPLOAD_FOLDER") {
        config.server.upload_dir = upload_dir;
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<()> {
    if config.llm.api_key.trim().is_empty() {
        return Err(Error::config(
            "Missing provider API key: set GEMINI_API_KEY or llm.api_key",
        ));
    }
    if config.llm.timeout_secs == 0 {
        return Err(Error::config("llm.timeout_secs must be greater than zero"));
    }
    if config.server.upload_dir.trim().is_empty() {
        return Err(Error::config("server.upload_dir must not be empty"));
    }
    Ok(())
}
