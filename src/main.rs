use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use daylog::config::{self, Config};
use daylog::relay;
use daylog::Logger;

fn main() -> Result<()> {
    // Diagnostics about the logger itself go to stderr, never into the log files
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "daylog=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config::config_file_path);
    let config = Config::load_from(&config_path)?;

    let logger = Logger::from_config(&config)
        .with_context(|| format!("Failed to initialize logging in {}", config.log_dir().display()))?;

    println!("Log path: {}", logger.current_path().display());
    logger.info("daylog", "Relaying standard input");

    let count = relay::relay(io::stdin().lock(), &logger).context("Failed to read standard input")?;
    logger.info("daylog", &format!("Relayed {} lines", count));

    Ok(())
}
