//! Utility functions for CLI operations.
//!
//! Common helpers used across CLI commands: data directory resolution,
//! configuration loading, store opening, caller identity handling, and
//! output formatting.

use crate::error::CliError;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tollgate::config::default_data_dir;
use tollgate::{AccountId, Config, ConfigBuilder, Store, StoreConfig};

/// Name of the store file inside the data directory.
pub const STORE_FILE_NAME: &str = "tollgate.db";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Authenticated caller identity for this invocation.
    pub from: Option<String>,

    /// Override the default store lock timeout (in seconds).
    pub busy_timeout: Option<u32>,
}

/// Resolve the data directory: `--data-dir` or `~/.tollgate`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref dir) = global.data_dir {
        return Ok(dir.clone());
    }
    default_data_dir().map_err(|e| CliError::Config(e.to_string()))
}

/// Load the merged configuration for this invocation.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the ledger store in the resolved data directory.
pub fn open_store(global: &GlobalOptions, config: &Config) -> Result<Store, CliError> {
    let store_path = resolve_data_dir(global)?.join(STORE_FILE_NAME);

    let mut store_config = StoreConfig::new(store_path);
    if let Some(timeout_seconds) = global.busy_timeout {
        store_config =
            store_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        store_config = store_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }

    Store::open(store_config).map_err(CliError::from)
}

/// The caller identity for an authenticated operation.
///
/// # Errors
///
/// Returns `InvalidArguments` when no identity was supplied or it is not
/// a usable account identity.
pub fn require_caller(global: &GlobalOptions) -> Result<AccountId, CliError> {
    let raw = global.from.as_deref().ok_or_else(|| {
        CliError::InvalidArguments(
            "caller identity required: pass --from <ACCOUNT> or set TOLLGATE_ACCOUNT".to_string(),
        )
    })?;
    AccountId::new(raw).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.to_rfc3339()
}
