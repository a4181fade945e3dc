//! Configuration management for hostsmate.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::error::{HostsError, Result};
use crate::validation::validate_source_url;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hostsmate/config.yaml";

/// Per-request timeout used when the config does not override it.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Upper bound on simultaneous source downloads.
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Hard ceiling for `max_concurrent_fetches`, whatever the config says.
const MAX_CONCURRENT_FETCHES_LIMIT: usize = 64;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to the system hosts file
    pub hosts_file: PathBuf,

    /// Timeout for a single source download, in seconds
    pub fetch_timeout_secs: u64,

    /// Maximum number of sources downloaded at the same time
    pub max_concurrent_fetches: usize,

    /// URLs serving domains to block
    pub blacklist_sources: Vec<String>,

    /// URLs serving domains that must never be blocked
    pub whitelist_sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: default_hosts_path(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            blacklist_sources: Vec::new(),
            whitelist_sources: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing or malformed file is a [`HostsError::Config`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HostsError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            HostsError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.hosts_file.as_os_str().is_empty() {
            return Err(HostsError::Config("hosts_file cannot be empty".to_string()));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(HostsError::Config(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrent_fetches == 0
            || self.max_concurrent_fetches > MAX_CONCURRENT_FETCHES_LIMIT
        {
            return Err(HostsError::Config(format!(
                "max_concurrent_fetches must be between 1 and {}",
                MAX_CONCURRENT_FETCHES_LIMIT
            )));
        }

        for url in self.blacklist_sources.iter().chain(&self.whitelist_sources) {
            validate_source_url(url).map_err(|e| HostsError::Config(e.to_string()))?;
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| HostsError::Config(format!("Failed to serialize config: {}", e)))?;

        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut temp_file =
            NamedTempFile::new_in(parent_dir).map_err(|e| HostsError::file_io(parent_dir, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| HostsError::file_io(temp_file.path(), e))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| HostsError::file_io(temp_file.path(), e))?;

        temp_file
            .persist(path)
            .map_err(|e| HostsError::file_io(path, e.error))?;

        Ok(())
    }

    /// Per-request timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// Platform location of the hosts file.
pub fn default_hosts_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}
