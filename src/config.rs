//! Runtime configuration, resolved once in `main` and passed to every handler.
//!
//! The store location comes from `--file`, then the `TD_FILE` environment
//! variable, then `~/.td.json`.

use crate::error::{Result, TodoError};
use directories::BaseDirs;
use std::ffi::OsString;
use std::path::PathBuf;

/// Store file name relative to the home directory
pub const DEFAULT_FILE_NAME: &str = ".td.json";

/// Environment variable overriding the store location
pub const FILE_ENV_VAR: &str = "TD_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store file
    pub file: PathBuf,
    /// Detail labels in listings and debug logging
    pub verbose: bool,
}

impl Config {
    pub fn resolve(file: Option<PathBuf>, verbose: bool) -> Result<Self> {
        Self::resolve_with(file, std::env::var_os(FILE_ENV_VAR), verbose)
    }

    fn resolve_with(file: Option<PathBuf>, env_file: Option<OsString>, verbose: bool) -> Result<Self> {
        let from_env = env_file.filter(|v| !v.is_empty()).map(PathBuf::from);
        let file = match file.or(from_env) {
            Some(file) => file,
            None => default_file()?,
        };
        Ok(Config { file, verbose })
    }
}

/// Log filter used when `RUST_LOG` is not set
pub fn log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

fn default_file() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_FILE_NAME))
        .ok_or(TodoError::NoHomeDirectory)
}
