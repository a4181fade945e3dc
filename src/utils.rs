//! Common utility functions used across modules.
//!
//! This module provides shared formatting and system helpers:
//! - [`format_count`] - Format counts with K/M suffix (1.5K, 2.3M)
//! - [`format_count_with_separator`] - Format counts with thousands separator (1,234,567)
//! - [`format_bytes`] - Format byte sizes (KB, MB, GB)
//! - [`check_root`] - Ensure the process runs as root
//! - [`check_replaceable`] - Ensure a file can be atomically replaced

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::{HostsError, Result};

/// Format a count with K/M suffix for compact display.
///
/// # Examples
/// ```
/// use hostsmate::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(1500), "1.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format a number with thousands separators (commas).
///
/// # Examples
/// ```
/// use hostsmate::utils::format_count_with_separator;
/// assert_eq!(format_count_with_separator(1000), "1,000");
/// assert_eq!(format_count_with_separator(1234567), "1,234,567");
/// ```
pub fn format_count_with_separator(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format bytes in human-readable form (KB, MB, GB).
///
/// # Examples
/// ```
/// use hostsmate::utils::format_bytes;
/// assert_eq!(format_bytes(1024), "1.0 KB");
/// assert_eq!(format_bytes(1_500_000), "1.4 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Fail unless the effective user is root.
pub fn check_root() -> Result<()> {
    // SAFETY: geteuid() is a simple syscall that reads the effective user ID.
    // It has no preconditions, never fails, and doesn't modify any state.
    let euid = unsafe { libc::geteuid() };

    if euid != 0 {
        return Err(HostsError::Permission(
            "This operation modifies system files. Please run with sudo.".to_string(),
        ));
    }
    Ok(())
}

/// Fail unless the directory holding `path` is writable by this process.
///
/// Replacing a file goes through a rename in its directory, so that is the
/// permission that matters, not the file's own mode.
pub fn check_replaceable(path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let c_dir = CString::new(dir.as_os_str().as_bytes())
        .map_err(|_| HostsError::Invalid(format!("Path contains a NUL byte: {:?}", dir)))?;

    // SAFETY: c_dir is a valid NUL-terminated string that outlives the call.
    let rc = unsafe { libc::access(c_dir.as_ptr(), libc::W_OK) };

    if rc != 0 {
        return Err(HostsError::Permission(format!(
            "Cannot write to {:?}. Please run with sudo.",
            dir
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(500), "500");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(1_500_000), "1.5M");
    }

    #[test]
    fn test_format_count_with_separator() {
        assert_eq!(format_count_with_separator(0), "0");
        assert_eq!(format_count_with_separator(42), "42");
        assert_eq!(format_count_with_separator(999), "999");
        assert_eq!(format_count_with_separator(1000), "1,000");
        assert_eq!(format_count_with_separator(12345), "12,345");
        assert_eq!(format_count_with_separator(123456), "123,456");
        assert_eq!(format_count_with_separator(1234567), "1,234,567");
        assert_eq!(format_count_with_separator(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1500), "1.5 KB");
        assert_eq!(format_bytes(1_500_000_000), "1.4 GB");
    }

    #[test]
    fn test_check_replaceable_temp_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(check_replaceable(&dir.path().join("hosts")).is_ok());
    }

    #[test]
    fn test_check_replaceable_missing_dir() {
        let result = check_replaceable(Path::new("/nonexistent-hostsmate-dir/hosts"));
        assert!(matches!(result, Err(HostsError::Permission(_))));
    }

    #[test]
    fn test_check_root_matches_euid() {
        let is_root = unsafe { libc::geteuid() } == 0;
        assert_eq!(check_root().is_ok(), is_root);
    }
}
