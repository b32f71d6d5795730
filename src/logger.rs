use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Level filter, e.g. `RENTALDB_LOG=debug` or `RENTALDB_LOG=rentaldb=trace`.
pub const LOG_ENV: &str = "RENTALDB_LOG";

/// Route tracing output to an append-only file so it never mixes with the
/// interactive session on stdout.
pub fn init(log_path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = log_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path.to_path_buf())
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be installed once per process, so only
    // the filter fallback is exercised here.
    use super::*;

    #[test]
    fn unset_filter_defaults_to_info() {
        std::env::remove_var(LOG_ENV);
        assert_eq!(filter_from_env().to_string(), "info");
    }
}
