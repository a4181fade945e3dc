//! Centralized validation and normalization for hostsmate.
//!
//! This module provides unified handling of:
//! - Domain names (normalization and validation)
//! - Source URLs
//! - Time intervals (systemd timer format)

use reqwest::Url;

use crate::error::{HostsError, Result};

/// Maximum length of a fully qualified domain name.
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Names that belong to the fixed hosts-file boilerplate and must never be
/// turned into block entries.
const RESERVED_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "0.0.0.0",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
];

/// Strip the scheme and a leading `www.` from a domain argument and lowercase it.
///
/// Input with a scheme (`https://www.example.com/path`) is parsed as a URL and
/// reduced to its host. Input without a scheme is treated as a bare hostname.
///
/// # Examples
/// ```
/// use hostsmate::validation::normalize_domain;
/// assert_eq!(normalize_domain("http://www.Example.com/x").unwrap(), "example.com");
/// assert_eq!(normalize_domain("www.example.com").unwrap(), "example.com");
/// assert_eq!(normalize_domain("ads.example.com").unwrap(), "ads.example.com");
/// ```
pub fn normalize_domain(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HostsError::Invalid("Domain cannot be empty".to_string()));
    }

    let host = if trimmed.contains("://") {
        let url = Url::parse(trimmed)
            .map_err(|e| HostsError::Invalid(format!("Invalid URL '{}': {}", trimmed, e)))?;
        url.host_str()
            .ok_or_else(|| HostsError::Invalid(format!("URL '{}' has no host", trimmed)))?
            .to_string()
    } else {
        trimmed.to_string()
    };

    let host = host.to_ascii_lowercase();
    let mut host = host.trim_end_matches('.');
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    Ok(host.to_string())
}

/// Normalize and validate a domain supplied by the user.
///
/// # Examples
/// ```
/// use hostsmate::validation::validate_domain;
/// assert_eq!(validate_domain("https://www.ads.example.com").unwrap(), "ads.example.com");
/// assert!(validate_domain("not a domain").is_err());
/// assert!(validate_domain("localhost").is_err());
/// ```
pub fn validate_domain(input: &str) -> Result<String> {
    let domain = normalize_domain(input)?;

    if !is_plausible_domain(&domain) {
        return Err(HostsError::Invalid(format!(
            "'{}' is not a valid domain name",
            input.trim()
        )));
    }
    if is_reserved_hostname(&domain) {
        return Err(HostsError::Invalid(format!(
            "'{}' is part of the hosts file boilerplate and cannot be blocked",
            domain
        )));
    }

    Ok(domain)
}

/// Check that a string looks like a hostname: ASCII labels of
/// `[a-z0-9_-]`, no empty labels, within DNS length limits.
pub fn is_plausible_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    })
}

/// Whether a hostname belongs to the fixed localhost/broadcast boilerplate.
pub fn is_reserved_hostname(domain: &str) -> bool {
    RESERVED_HOSTNAMES.contains(&domain)
}

/// Validate a blacklist/whitelist source URL. Only HTTPS sources are accepted.
///
/// # Examples
/// ```
/// use hostsmate::validation::validate_source_url;
/// assert!(validate_source_url("https://example.com/hosts").is_ok());
/// assert!(validate_source_url("http://example.com/hosts").is_err());
/// assert!(validate_source_url("not a url").is_err());
/// ```
pub fn validate_source_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| HostsError::Invalid(format!("Invalid source URL '{}': {}", trimmed, e)))?;

    if parsed.scheme() != "https" {
        return Err(HostsError::Invalid(format!(
            "Source URL must use HTTPS: {}",
            trimmed
        )));
    }
    if parsed.host_str().is_none() {
        return Err(HostsError::Invalid(format!(
            "Source URL has no host: {}",
            trimmed
        )));
    }

    Ok(trimmed.to_string())
}

/// Timer interval validation (e.g., "4h", "30m", "1d").
///
/// Requires ASCII-only input to prevent Unicode-related edge cases.
/// Valid suffixes: `s` (seconds), `m` (minutes), `h` (hours), `d` (days)
///
/// # Examples
/// ```
/// use hostsmate::validation::validate_interval;
/// assert!(validate_interval("1d").is_ok());
/// assert!(validate_interval("4x").is_err());
/// ```
pub fn validate_interval(interval: &str) -> Result<()> {
    if interval.is_empty() {
        return Err(HostsError::Invalid(
            "Timer interval cannot be empty".to_string(),
        ));
    }

    if !interval.is_ascii() {
        return Err(HostsError::Invalid(format!(
            "Invalid timer interval '{}'. Only ASCII characters allowed",
            interval
        )));
    }

    if interval.len() < 2 {
        return Err(HostsError::Invalid(format!(
            "Invalid timer interval '{}'. Use format like '4h', '30m', '1d'",
            interval
        )));
    }

    let (num_part, suffix) = interval.split_at(interval.len() - 1);

    if !matches!(suffix, "s" | "m" | "h" | "d") {
        return Err(HostsError::Invalid(format!(
            "Invalid timer interval '{}'. Suffix must be s, m, h, or d",
            interval
        )));
    }

    match num_part.parse::<u32>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(HostsError::Invalid(format!(
            "Invalid timer interval '{}'. Number part must be a positive integer",
            interval
        ))),
    }
}
