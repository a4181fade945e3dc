//! Source list commands: add-source, remove-source, list-sources.

use anyhow::Result;
use std::path::Path;

use crate::lock::LockGuard;
use crate::sources::{SourceKind, SourceRegistry};

/// Add `url` to the `kind` source list.
pub fn add(config_path: &Path, kind: SourceKind, url: &str) -> Result<()> {
    let _lock = LockGuard::acquire_for(config_path)?;
    let mut registry = SourceRegistry::open(config_path)?;

    if registry.add(kind, url)? {
        println!("[OK] Added {} source: {}", kind, url.trim());
    } else {
        println!("[--] {} source already present: {}", kind, url.trim());
    }
    Ok(())
}

/// Remove `url` from the `kind` source list.
pub fn remove(config_path: &Path, kind: SourceKind, url: &str) -> Result<()> {
    let _lock = LockGuard::acquire_for(config_path)?;
    let mut registry = SourceRegistry::open(config_path)?;

    if registry.remove(kind, url)? {
        println!("[OK] Removed {} source: {}", kind, url.trim());
    } else {
        println!("[--] {} source not present: {}", kind, url.trim());
    }
    Ok(())
}

/// Print the `kind` source list.
pub fn list(config_path: &Path, kind: SourceKind) -> Result<()> {
    let registry = SourceRegistry::open(config_path)?;
    let urls = registry.list(kind);

    if urls.is_empty() {
        println!("No {} sources configured.", kind);
        return Ok(());
    }

    println!("{} sources ({}):", kind, urls.len());
    for (i, url) in urls.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, url);
    }
    Ok(())
}
