use anyhow::Result;
use prompt_gateway::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG, when set, takes precedence over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = &config.server.logs.level;
            if let Err(e) = validate_log_level(level) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            EnvFilter::try_new(level)?
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting prompt gateway");
    info!("Configuration loaded successfully");

    server::run(config).await?;

    Ok(())
}
