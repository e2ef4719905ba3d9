use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive("pims=info".parse()?))
}

/// Logs to stderr. Used by the scripted subcommands.
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter()?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// The terminal UI owns stdout and stderr, so logs only go to `LOG_FILE`
/// when one is configured.
pub fn init_for_tui(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter()?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
