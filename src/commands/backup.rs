//! Backup command implementation.

use anyhow::Result;
use std::path::Path;

use crate::hosts_file::HostsFile;

use super::{load_config, report_not_found};

/// Copy the hosts file into `dir`.
pub fn run(config_path: &Path, dir: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let hosts = HostsFile::new(&config.hosts_file);

    report_not_found(hosts.backup(dir).map(|dest| {
        println!("[OK] Hosts file backed up to {}", dest.display());
    }))
}
