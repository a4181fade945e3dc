//! The update run: fetch whitelist, fetch blacklist, extract, build.
//!
//! ```text
//!  whitelist URLs ──fetch──> Whitelist ─┐
//!                                       ├─> Extractor ──> DomainSet ──> HostsFile::build
//!  blacklist URLs ──fetch──> raw text ──┘
//! ```
//!
//! Stages run strictly in that order. Only the fetches are concurrent; the
//! extraction and the rebuild start once every request has finished or
//! failed.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Config;
use crate::domains::DomainSet;
use crate::error::{HostsError, Result};
use crate::extractor::{Extractor, Whitelist};
use crate::fetcher::Fetcher;
use crate::hosts_file::HostsFile;
use crate::utils::format_count;

/// What an update run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateReport {
    /// Blacklist sources configured
    pub sources_total: usize,
    /// Blacklist sources fetched successfully
    pub sources_ok: usize,
    /// Entries in the whitelist
    pub whitelist_size: usize,
    /// Unique entries written to the hosts file
    pub entries_written: usize,
    /// Custom-domain lines carried over
    pub custom_lines: usize,
}

impl UpdateReport {
    pub fn sources_failed(&self) -> usize {
        self.sources_total - self.sources_ok
    }
}

/// Fetch the whitelist sources and build the whitelist.
///
/// Whitelist failures are tolerated like any other source failure; if none
/// can be fetched the run continues with an empty whitelist.
pub async fn fetch_whitelist(config: &Config, fetcher: &Fetcher) -> Whitelist {
    if config.whitelist_sources.is_empty() {
        return Whitelist::default();
    }

    info!(
        "Fetching {} whitelist source(s)...",
        config.whitelist_sources.len()
    );
    let outcome = fetcher.fetch_all(&config.whitelist_sources).await;
    if outcome.succeeded == 0 {
        warn!("No whitelist source could be fetched; continuing without whitelist");
    }

    let whitelist = Whitelist::from_text(&outcome.buffer);
    info!("Whitelist: {} entries", format_count(whitelist.len()));
    whitelist
}

/// Fetch and extract every blacklist source into a fresh [`DomainSet`].
///
/// Returns the set and the number of sources fetched successfully. Fails
/// only if sources are configured and every one of them failed.
pub async fn collect_domains(
    config: &Config,
    fetcher: &Fetcher,
    extractor: &Extractor,
) -> Result<(DomainSet, usize)> {
    let total = config.blacklist_sources.len();
    info!("Fetching {} blacklist source(s)...", total);

    let outcome = fetcher.fetch_all(&config.blacklist_sources).await;
    if total > 0 && outcome.succeeded == 0 {
        return Err(HostsError::AllSourcesFailed(total));
    }

    let mut domains = DomainSet::new();
    let stats = extractor.extract_into(&outcome.buffer, &mut domains);
    info!(
        "Extracted {} unique domains from {} lines ({} whitelisted)",
        format_count(domains.count()),
        format_count(stats.lines),
        format_count(stats.whitelisted)
    );

    Ok((domains, outcome.succeeded))
}

/// Run a full update against the hosts file named in `config`.
pub async fn run_update(config: &Config, fetcher: &Fetcher, date: NaiveDate) -> Result<UpdateReport> {
    let whitelist = fetch_whitelist(config, fetcher).await;
    let whitelist_size = whitelist.len();
    let extractor = Extractor::new(whitelist);

    let (domains, sources_ok) = collect_domains(config, fetcher, &extractor).await?;

    let hosts = HostsFile::new(&config.hosts_file);
    let build = hosts.build(domains, date)?;

    Ok(UpdateReport {
        sources_total: config.blacklist_sources.len(),
        sources_ok,
        whitelist_size,
        entries_written: build.entries,
        custom_lines: build.custom_lines,
    })
}
