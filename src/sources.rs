//! Blacklist and whitelist source registry.
//!
//! The registry is a view over the `blacklist_sources` / `whitelist_sources`
//! lists of the configuration file. Every mutation is persisted immediately.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::validation::validate_source_url;

/// Which source list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SourceKind {
    Blacklist,
    Whitelist,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Blacklist => f.write_str("blacklist"),
            SourceKind::Whitelist => f.write_str("whitelist"),
        }
    }
}

/// Source lists backed by the configuration file at `path`.
pub struct SourceRegistry {
    path: PathBuf,
    config: Config,
}

impl SourceRegistry {
    /// Open the registry. Fails with a config error if the file is missing or malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = Config::load(&path)?;
        Ok(Self { path, config })
    }

    /// The configuration the registry was loaded from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ordered URLs of the given kind.
    pub fn list(&self, kind: SourceKind) -> &[String] {
        match kind {
            SourceKind::Blacklist => &self.config.blacklist_sources,
            SourceKind::Whitelist => &self.config.whitelist_sources,
        }
    }

    /// Insert `url` if absent and persist. Returns `false` if it was already present.
    pub fn add(&mut self, kind: SourceKind, url: &str) -> Result<bool> {
        let url = validate_source_url(url)?;

        if self.list(kind).contains(&url) {
            return Ok(false);
        }

        self.list_mut(kind).push(url.clone());
        self.config.save(&self.path)?;

        info!("Added {} source {}", kind, url);
        Ok(true)
    }

    /// Delete `url` if present and persist. Returns `false` if it was not there.
    pub fn remove(&mut self, kind: SourceKind, url: &str) -> Result<bool> {
        let url = url.trim();
        let list = self.list_mut(kind);
        let original_len = list.len();
        list.retain(|x| x != url);

        if list.len() == original_len {
            return Ok(false);
        }

        self.config.save(&self.path)?;

        info!("Removed {} source {}", kind, url);
        Ok(true)
    }

    fn list_mut(&mut self, kind: SourceKind) -> &mut Vec<String> {
        match kind {
            SourceKind::Blacklist => &mut self.config.blacklist_sources,
            SourceKind::Whitelist => &mut self.config.whitelist_sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostsError;
    use tempfile::TempDir;

    const PRESENT_SOURCES: &[&str] = &[
        "https://example.com/hosts.txt",
        "https://another-example.com/hosts",
        "https://one-more-example.com/hosts_file",
    ];

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let config = Config {
            hosts_file: dir.path().join("hosts"),
            blacklist_sources: PRESENT_SOURCES.iter().map(|s| s.to_string()).collect(),
            whitelist_sources: vec!["https://example.com/whitelist.txt".to_string()],
            ..Default::default()
        };
        config.save(&path).unwrap();
        (dir, path)
    }

    #[test]
    fn test_list_returns_sources_in_order() {
        let (_dir, path) = setup();
        let registry = SourceRegistry::open(&path).unwrap();
        assert_eq!(registry.list(SourceKind::Blacklist), PRESENT_SOURCES);
        assert_eq!(registry.list(SourceKind::Whitelist).len(), 1);
    }

    #[test]
    fn test_open_missing_store_is_config_error() {
        let dir = TempDir::new().unwrap();
        let result = SourceRegistry::open(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(HostsError::Config(_))));
    }

    #[test]
    fn test_add_persists() {
        let (_dir, path) = setup();
        let mut registry = SourceRegistry::open(&path).unwrap();
        assert!(registry
            .add(SourceKind::Blacklist, "https://test-2.co.uk/hosts")
            .unwrap());

        let reopened = SourceRegistry::open(&path).unwrap();
        let list = reopened.list(SourceKind::Blacklist);
        assert_eq!(list.len(), 4);
        assert_eq!(list.last().unwrap(), "https://test-2.co.uk/hosts");
    }

    #[test]
    fn test_add_existing_is_noop() {
        let (_dir, path) = setup();
        let mut registry = SourceRegistry::open(&path).unwrap();
        assert!(!registry
            .add(SourceKind::Blacklist, PRESENT_SOURCES[0])
            .unwrap());
        assert_eq!(registry.list(SourceKind::Blacklist).len(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_url() {
        let (_dir, path) = setup();
        let mut registry = SourceRegistry::open(&path).unwrap();
        assert!(registry
            .add(SourceKind::Whitelist, "http://insecure.example.com")
            .is_err());
        assert!(registry.add(SourceKind::Whitelist, "garbage").is_err());
        assert_eq!(registry.list(SourceKind::Whitelist).len(), 1);
    }

    #[test]
    fn test_remove_persists() {
        let (_dir, path) = setup();
        let mut registry = SourceRegistry::open(&path).unwrap();
        assert!(registry
            .remove(SourceKind::Blacklist, PRESENT_SOURCES[1])
            .unwrap());

        let reopened = SourceRegistry::open(&path).unwrap();
        assert!(!reopened
            .list(SourceKind::Blacklist)
            .contains(&PRESENT_SOURCES[1].to_string()));
    }

    #[test]
    fn test_remove_absent_reports_false() {
        let (_dir, path) = setup();
        let before = std::fs::read_to_string(&path).unwrap();
        let mut registry = SourceRegistry::open(&path).unwrap();
        assert!(!registry
            .remove(SourceKind::Whitelist, "https://not-there.example.com")
            .unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_kinds_are_independent() {
        let (_dir, path) = setup();
        let mut registry = SourceRegistry::open(&path).unwrap();
        registry
            .add(SourceKind::Whitelist, PRESENT_SOURCES[0])
            .unwrap();
        assert_eq!(registry.list(SourceKind::Whitelist).len(), 2);
        assert_eq!(registry.list(SourceKind::Blacklist).len(), 3);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Blacklist.to_string(), "blacklist");
        assert_eq!(SourceKind::Whitelist.to_string(), "whitelist");
    }
}
