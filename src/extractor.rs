//! Extraction of block entries from raw source text.
//!
//! Sources come in several dialects: classic hosts files
//! (`127.0.0.1 domain` / `0.0.0.0 domain`), bare domain lists, and
//! assorted filter formats. Each line is reduced to at most one
//! normalized `0.0.0.0 <domain>\n` entry.

use regex::Regex;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::LazyLock;

use crate::domains::{entry_for, DomainSet, BLOCK_IP};
use crate::validation::{is_plausible_domain, is_reserved_hostname, normalize_domain};

const LOCALHOST_IP: &str = "127.0.0.1";

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z0-9-]+\.)+[a-z0-9-]+").expect("valid domain extraction regex")
});

/// Lines that never carry a block entry: blank, comments, HTML, IPv6.
fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with('<') || line.contains("::1")
}

/// Pull the raw domain candidate out of a trimmed, lowercased line.
fn raw_domain(line: &str) -> Option<&str> {
    if line.starts_with(LOCALHOST_IP) || line.starts_with(BLOCK_IP) {
        line.split_whitespace().nth(1)
    } else {
        DOMAIN_REGEX
            .find_iter(line)
            .map(|m| m.as_str())
            .find(|candidate| candidate.parse::<IpAddr>().is_err())
    }
}

/// Extract and normalize the domain of a single line, ignoring any whitelist.
///
/// ```
/// use hostsmate::extractor::parse_domain;
/// assert_eq!(parse_domain("127.0.0.1 Ads.Example.com").as_deref(), Some("ads.example.com"));
/// assert_eq!(parse_domain("||tracker.example.net^").as_deref(), Some("tracker.example.net"));
/// assert_eq!(parse_domain("# comment"), None);
/// ```
pub fn parse_domain(line: &str) -> Option<String> {
    let line = line.trim().to_ascii_lowercase();
    if is_skippable(&line) {
        return None;
    }

    let domain = normalize_domain(raw_domain(&line)?).ok()?;

    if !is_plausible_domain(&domain)
        || is_reserved_hostname(&domain)
        || domain.parse::<IpAddr>().is_ok()
    {
        return None;
    }

    Some(domain)
}

/// Domains and raw lines that must never end up in the hosts file.
#[derive(Debug, Default, Clone)]
pub struct Whitelist {
    lines: HashSet<String>,
    domains: HashSet<String>,
}

impl Whitelist {
    /// Index the lines of one or more whitelist sources.
    ///
    /// Every trimmed line is stored as-is, and the domain it carries (if
    /// any) is stored as well, so `ads.example.com` and
    /// `0.0.0.0 ads.example.com` whitelist the same entry.
    pub fn from_text(text: &str) -> Self {
        let mut lines = HashSet::new();
        let mut domains = HashSet::new();

        for line in text.lines() {
            let trimmed = line.trim().to_ascii_lowercase();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some(domain) = parse_domain(&trimmed) {
                domains.insert(domain);
            }
            lines.insert(trimmed);
        }

        Self { lines, domains }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.domains.contains(value) || self.lines.contains(value)
    }

    /// Distinct whitelisted domains, plus lines that carry no domain.
    pub fn len(&self) -> usize {
        let bare = self
            .lines
            .iter()
            .filter(|line| parse_domain(line).is_none())
            .count();
        self.domains.len() + bare
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Counters collected while extracting a buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    /// Lines read from the buffer
    pub lines: usize,
    /// Lines that produced an entry not already in the set
    pub added: usize,
    /// Lines dropped because of the whitelist
    pub whitelisted: usize,
}

/// Turns raw source text into normalized entries, honoring a whitelist.
#[derive(Debug, Default)]
pub struct Extractor {
    whitelist: Whitelist,
}

impl Extractor {
    pub fn new(whitelist: Whitelist) -> Self {
        Self { whitelist }
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Normalized entry for `line`, or `None` if the line is skipped.
    pub fn extract_line(&self, line: &str) -> Option<String> {
        self.classify(line).ok().flatten()
    }

    /// Stream `raw` once, inserting every extracted entry into `domains`.
    pub fn extract_into(&self, raw: &str, domains: &mut DomainSet) -> ExtractStats {
        let mut stats = ExtractStats::default();

        for line in raw.lines() {
            stats.lines += 1;
            match self.classify(line) {
                Ok(Some(entry)) => {
                    if domains.add(entry) {
                        stats.added += 1;
                    }
                }
                Ok(None) => {}
                Err(Whitelisted) => stats.whitelisted += 1,
            }
        }

        stats
    }

    fn classify(&self, line: &str) -> Result<Option<String>, Whitelisted> {
        let trimmed = line.trim().to_ascii_lowercase();
        if is_skippable(&trimmed) {
            return Ok(None);
        }
        if self.whitelist.contains(&trimmed) {
            return Err(Whitelisted);
        }

        match parse_domain(&trimmed) {
            Some(domain) if self.whitelist.contains(&domain) => Err(Whitelisted),
            Some(domain) => Ok(Some(entry_for(&domain))),
            None => Ok(None),
        }
    }
}

/// Marker for a line dropped by the whitelist.
#[derive(Debug)]
struct Whitelisted;
