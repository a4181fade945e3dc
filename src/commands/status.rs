//! Status command implementation.

use anyhow::Result;
use std::path::Path;

use crate::autorun::timer_installed;
use crate::hosts_file::HostsFile;
use crate::utils::format_count_with_separator;

use super::load_config;

/// Run the status command
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let hosts = HostsFile::new(&config.hosts_file);

    let state = if hosts.is_suspended() {
        "SUSPENDED"
    } else if hosts.path().exists() {
        "ACTIVE"
    } else {
        "NO HOSTS FILE"
    };

    println!();
    println!("hostsmate: {}", state);
    println!("Hosts file: {}", hosts.path().display());

    if let Ok(summary) = hosts.summary() {
        println!(
            "Generated: {}",
            summary
                .generated_on
                .as_deref()
                .unwrap_or("never (not built by hostsmate)")
        );
        println!(
            "Blocked entries: {}",
            format_count_with_separator(summary.blocked_entries)
        );
        println!("Custom domains: {}", summary.custom_domains);
    }

    println!();
    println!(
        "Sources: {} blacklist, {} whitelist",
        config.blacklist_sources.len(),
        config.whitelist_sources.len()
    );
    println!(
        "Autorun: {}",
        if timer_installed() { "enabled" } else { "disabled" }
    );
    println!();

    Ok(())
}
