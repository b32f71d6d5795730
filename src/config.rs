use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "rentaldb";
const LOG_FILE: &str = "rentaldb.log";

pub const USER_VAR: &str = "DB_USER";
pub const PASS_VAR: &str = "DB_PASS";
pub const DSN_VAR: &str = "DB_DSN";

/// Used when `DB_DSN` is absent.
pub const DEFAULT_DSN: &str = "postgres://localhost:5432/carrentals";

/// Credentials bundle, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub user: String,
    pub password: String,
    pub dsn: String,
}

impl Config {
    /// Read the bundle from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the bundle from any key lookup. Empty user or password is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let user = lookup(USER_VAR).unwrap_or_default();
        let password = lookup(PASS_VAR).unwrap_or_default();
        if user.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let dsn = lookup(DSN_VAR)
            .filter(|dsn| !dsn.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DSN.to_string());

        Ok(Self { user, password, dsn })
    }
}

/// Return the application config directory path, creating it if missing.
pub fn get_app_config_path() -> Result<PathBuf> {
    let mut path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    path.push(APP_NAME);
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(get_app_config_path()?.join(LOG_FILE))
}

/// Split `KEY=VALUE` lines. Blank lines and `#` comments are skipped, the first
/// `=` separates key from value, and a line without `=` assigns an empty value.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// What an env file did to the process environment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnvFile {
    pub applied: usize,
    /// Keys that `set_var` would reject, left out of the environment.
    pub skipped: Vec<String>,
}

/// Apply an env file to the process environment, overwriting existing values.
/// A missing file applies nothing. Nothing is logged here since this runs
/// before the logger is installed.
pub fn load_env_file(path: &Path) -> Result<EnvFile> {
    let mut report = EnvFile::default();
    if !path.is_file() {
        return Ok(report);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;

    for (key, value) in parse_env_file(&contents) {
        if key.is_empty() || key.contains('\0') || value.contains('\0') {
            report.skipped.push(key);
            continue;
        }
        std::env::set_var(&key, &value);
        report.applied += 1;
    }
    Ok(report)
}
