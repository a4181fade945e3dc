//! Autorun command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::autorun::Autorun;
use crate::cli::AutorunAction;
use crate::cmd_abstraction::RealCommandExecutor;
use crate::utils::check_root;

use super::report_not_found;

/// Run the autorun command
pub fn run(action: AutorunAction, config_path: &Path) -> Result<()> {
    check_root()?;

    let binary = std::env::current_exe().context("Failed to locate the hostsmate binary")?;
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("Config file {:?} not found", config_path))?;

    let executor = RealCommandExecutor::new();
    let autorun = Autorun::new(&executor, binary, config_path);

    match action {
        AutorunAction::Setup { interval } => {
            info!("Setting up automatic updates every {}...", interval);
            autorun.setup(&interval)?;
            println!("[OK] Hosts file will be updated every {}", interval);
            Ok(())
        }
        AutorunAction::Remove => report_not_found(autorun.remove().map(|()| {
            println!("[OK] Automatic updates removed");
        })),
    }
}
