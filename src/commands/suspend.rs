//! Suspend and resume commands.

use anyhow::Result;
use std::path::Path;

use crate::hosts_file::HostsFile;
use crate::lock::LockGuard;
use crate::utils::check_replaceable;

use super::{load_config, report_not_found};

/// Disable blocking until `resume`.
pub fn suspend(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    check_replaceable(&config.hosts_file)?;
    let _lock = LockGuard::acquire_for(config_path)?;

    let hosts = HostsFile::new(&config.hosts_file);
    report_not_found(hosts.suspend().map(|()| {
        println!(
            "[OK] Blocking suspended (hosts file moved to {})",
            hosts.suspended_path().display()
        );
        println!("     Run 'hostsmate resume' to restore it.");
    }))
}

/// Re-enable blocking.
pub fn resume(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    check_replaceable(&config.hosts_file)?;
    let _lock = LockGuard::acquire_for(config_path)?;

    let hosts = HostsFile::new(&config.hosts_file);
    report_not_found(hosts.resume().map(|()| {
        println!("[OK] Blocking resumed");
    }))
}
