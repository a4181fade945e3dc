//! Update command implementation.

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::{info, warn};

use crate::fetcher::Fetcher;
use crate::hosts_file::HostsFile;
use crate::lock::LockGuard;
use crate::pipeline::run_update;
use crate::utils::{check_replaceable, format_count_with_separator};

use super::load_config;

/// Run the update command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    check_replaceable(&config.hosts_file)?;
    let _lock = LockGuard::acquire_for(config_path)?;

    if HostsFile::new(&config.hosts_file).is_suspended() {
        anyhow::bail!("Blocking is suspended. Run 'hostsmate resume' before updating.");
    }

    if config.blacklist_sources.is_empty() {
        warn!("No blacklist sources configured. Check your configuration.");
    }

    info!("Updating hosts file...");

    let fetcher = Fetcher::new(&config)?;
    let report = run_update(&config, &fetcher, Local::now().date_naive()).await?;

    if report.sources_failed() > 0 {
        warn!(
            "{} of {} blacklist sources could not be fetched",
            report.sources_failed(),
            report.sources_total
        );
    }

    println!();
    println!("[OK] Hosts file updated: {}", config.hosts_file.display());
    println!(
        "     Sources: {}/{} fetched",
        report.sources_ok, report.sources_total
    );
    println!(
        "     Whitelist: {} entries",
        format_count_with_separator(report.whitelist_size)
    );
    println!(
        "     Blocked domains: {}",
        format_count_with_separator(report.entries_written)
    );
    println!("     Custom domains kept: {}", report.custom_lines);
    println!();

    Ok(())
}
