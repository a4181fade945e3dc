//! CLI command implementations.

pub mod autorun;
pub mod backup;
pub mod domain;
pub mod init;
pub mod source;
pub mod status;
pub mod suspend;
pub mod update;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::error::HostsError;

/// Load the config, pointing at `hostsmate init` when it is missing.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    Config::load(config_path).with_context(|| {
        format!(
            "Failed to load config from {:?} (run 'hostsmate init' to create it)",
            config_path
        )
    })
}

/// Print a not-found condition as a message; every other error propagates.
pub(crate) fn report_not_found(result: crate::error::Result<()>) -> Result<()> {
    match result {
        Err(HostsError::NotFound(msg)) => {
            println!("[--] {}", msg);
            Ok(())
        }
        other => Ok(other?),
    }
}
