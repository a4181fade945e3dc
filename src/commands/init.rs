//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::utils::check_replaceable;

/// Write the default config to `config_path`.
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}.\n\
             Use 'hostsmate init --force' to overwrite it.",
            config_path
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }
    check_replaceable(config_path)?;

    info!("Creating {:?}...", config_path);
    fs::write(config_path, Config::generate_default_yaml())
        .with_context(|| format!("Failed to write config file {:?}", config_path))?;
    fs::set_permissions(config_path, fs::Permissions::from_mode(0o644))
        .context("Failed to set config permissions")?;

    // Catch a broken template before the user hits it on update
    let config = Config::load(config_path)?;

    println!();
    println!("[OK] Configuration written to {}", config_path.display());
    println!(
        "     {} blacklist and {} whitelist sources",
        config.blacklist_sources.len(),
        config.whitelist_sources.len()
    );
    println!();
    println!("Next steps:");
    println!("  1. Review sources: hostsmate list-sources blacklist");
    println!("  2. Build the hosts file: sudo hostsmate update");
    println!("  3. Schedule updates: sudo hostsmate autorun setup");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hostsmate").join("config.yaml");

        run(&path, false).unwrap();
        let config = Config::load(&path).unwrap();
        assert!(!config.blacklist_sources.is_empty());
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "hosts_file: /tmp/hosts\n").unwrap();

        assert!(run(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hosts_file: /tmp/hosts\n");

        run(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("blacklist_sources"));
    }
}
