//! add-domain and remove-domain.

use anyhow::Result;
use std::path::Path;

use crate::hosts_file::HostsFile;
use crate::lock::LockGuard;
use crate::utils::check_replaceable;

use super::{load_config, report_not_found};

/// Block `domain` through the custom domains section.
pub fn add(config_path: &Path, domain: &str) -> Result<()> {
    let config = load_config(config_path)?;
    check_replaceable(&config.hosts_file)?;
    let _lock = LockGuard::acquire_for(config_path)?;

    let hosts = HostsFile::new(&config.hosts_file);
    report_not_found(hosts.add_blacklisted_domain(domain).map(|added| {
        if added {
            println!("[OK] \"{}\" is now blocked", domain.trim());
        } else {
            println!("[--] \"{}\" is already in the custom domains", domain.trim());
        }
    }))
}

/// Drop the first hosts line that maps `domain`.
pub fn remove(config_path: &Path, domain: &str) -> Result<()> {
    let config = load_config(config_path)?;
    check_replaceable(&config.hosts_file)?;
    let _lock = LockGuard::acquire_for(config_path)?;

    let hosts = HostsFile::new(&config.hosts_file);
    report_not_found(hosts.remove_domain(domain).map(|()| {
        println!("[OK] \"{}\" removed from {}", domain.trim(), hosts.path().display());
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hosts_file::{custom_block_of, END_MARKER, START_MARKER};
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("config.yaml");
        let config = Config {
            hosts_file: dir.path().join("hosts"),
            ..Config::default()
        };
        config.save(&config_path).unwrap();
        fs::write(
            &config.hosts_file,
            format!("{}\n{}\n0.0.0.0 ads.example.com\n", START_MARKER, END_MARKER),
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_add_then_remove() {
        let dir = TempDir::new().unwrap();
        let config_path = setup(&dir);
        let hosts = dir.path().join("hosts");

        add(&config_path, "www.mysite.com").unwrap();
        add(&config_path, "mysite.com").unwrap();
        let content = fs::read_to_string(&hosts).unwrap();
        assert_eq!(custom_block_of(&content), vec!["0.0.0.0 mysite.com"]);

        remove(&config_path, "mysite.com").unwrap();
        assert!(custom_block_of(&fs::read_to_string(&hosts).unwrap()).is_empty());
    }

    #[test]
    fn test_remove_absent_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = setup(&dir);
        let before = fs::read_to_string(dir.path().join("hosts")).unwrap();

        remove(&config_path, "absent.example.org").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("hosts")).unwrap(), before);
    }

    #[test]
    fn test_add_invalid_domain_fails() {
        let dir = TempDir::new().unwrap();
        let config_path = setup(&dir);
        assert!(add(&config_path, "no spaces.com").is_err());
    }
}
