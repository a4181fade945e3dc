//! The system hosts file: rebuild, line edits, suspension and backup.
//!
//! Every write goes to a temporary file in the same directory, is synced,
//! and only then renamed over the live file. A failure at any point before
//! the rename leaves the live file exactly as it was.

use chrono::NaiveDate;
use std::fs::{self, File, Permissions};
use std::io::{self, BufWriter, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domains::{entry_for, DomainSet, BLOCK_IP};
use crate::error::{HostsError, Result};
use crate::utils::format_count_with_separator;
use crate::validation::validate_domain;

/// First line of the user's custom-domain section.
pub const START_MARKER: &str = "# Start of the user's custom domains";

/// Last line of the user's custom-domain section.
pub const END_MARKER: &str = "# End of the user's custom domains";

const HEADER_TEMPLATE: &str = include_str!("../templates/hosts_header");

/// Mode given to a freshly created hosts file.
const DEFAULT_MODE: u32 = 0o644;

/// Name of the copy written by [`HostsFile::backup`].
const BACKUP_FILE_NAME: &str = "hosts_backup";

/// Render the generated header with an empty custom-domain slot.
pub fn render_header(date: NaiveDate, total: usize) -> String {
    render_header_with_custom(date, total, &[])
}

/// Render the generated header, placing `custom` lines between the sentinel markers.
pub fn render_header_with_custom(date: NaiveDate, total: usize, custom: &[String]) -> String {
    let date = date.format("%d-%b-%Y").to_string();
    let total = format_count_with_separator(total);

    HEADER_TEMPLATE
        .replace("{date}", &format!("{:<53}", date))
        .replace("{num_entries}", &format!("{:<32}", total))
        .replace("{custom_domains}", &custom.join("\n"))
}

/// Lines of the first custom-domain block in `content`.
///
/// Capture starts after the first start marker and stops at the first end
/// marker that follows it; later markers are ignored. Blank lines and
/// stray marker lines are dropped, everything else is kept in order. A
/// start marker without a matching end marker captures to end of file, so
/// the next build writes those lines back inside a closed block.
pub fn custom_block_of(content: &str) -> Vec<String> {
    let mut lines = content.lines().map(str::trim_end);

    if !lines.any(|line| line.trim() == START_MARKER) {
        return Vec::new();
    }

    let mut block = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed == END_MARKER {
            return block;
        }
        if trimmed.is_empty() || trimmed == START_MARKER {
            continue;
        }
        block.push(line.to_string());
    }

    warn!("Custom domain section has no end marker; keeping lines up to end of file");
    block
}

/// Whether a hosts line maps `domain` (as a whole name, not a substring).
fn line_maps_domain(line: &str, domain: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return false;
    }
    trimmed
        .split_whitespace()
        .skip(1)
        .any(|name| name.eq_ignore_ascii_case(domain))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Summary of a finished rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Blacklist entries written
    pub entries: usize,
    /// Custom-domain lines carried over from the previous file
    pub custom_lines: usize,
}

/// What the live hosts file currently contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsSummary {
    /// Generation date from the header, if the file was generated by us
    pub generated_on: Option<String>,
    /// Lines mapping a name to the block IP
    pub blocked_entries: usize,
    /// Lines in the custom-domain section
    pub custom_domains: usize,
}

/// Handle on the hosts file at a fixed path.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the file is moved while blocking is suspended (`hosts~`).
    pub fn suspended_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "hosts".into());
        name.push("~");
        self.path.with_file_name(name)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_path().exists() && !self.path.exists()
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                HostsError::NotFound(format!("Hosts file {:?} does not exist", self.path))
            } else {
                HostsError::file_io(&self.path, e)
            }
        })
    }

    /// Custom-domain lines of the current file; empty if the file is missing.
    pub fn extract_custom_domain_block(&self) -> Result<Vec<String>> {
        match self.read() {
            Ok(content) => Ok(custom_block_of(&content)),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Replace the hosts file with header, custom block and `domains`.
    ///
    /// The custom block is read from the current file before anything is
    /// written, so it survives the rebuild.
    pub fn build(&self, domains: DomainSet, date: NaiveDate) -> Result<BuildReport> {
        let total = domains.count();
        let custom = self.extract_custom_domain_block()?;
        let header = render_header_with_custom(date, total, &custom);

        info!("Building new hosts file at {:?}...", self.path);

        self.write_atomically(|out| {
            out.write_all(header.as_bytes())?;
            for entry in domains.all() {
                out.write_all(entry.as_bytes())?;
            }
            Ok(())
        })?;

        info!(
            "Hosts file {:?} rebuilt with {} entries ({} custom)",
            self.path,
            total,
            custom.len()
        );

        Ok(BuildReport {
            entries: total,
            custom_lines: custom.len(),
        })
    }

    /// Add `0.0.0.0 <domain>` to the top of the custom-domain section.
    ///
    /// Returns `false` without touching the file if the section already
    /// holds the domain. A file without a section gets one appended.
    pub fn add_blacklisted_domain(&self, domain: &str) -> Result<bool> {
        let domain = validate_domain(domain)?;
        let content = self.read()?;

        if custom_block_of(&content)
            .iter()
            .any(|line| line_maps_domain(line, &domain))
        {
            debug!("{} already in custom domains", domain);
            return Ok(false);
        }

        let entry = entry_for(&domain);
        let mut output = String::with_capacity(content.len() + entry.len());
        let mut inserted = false;

        for line in content.split_inclusive('\n') {
            output.push_str(line);
            if !inserted && line.trim() == START_MARKER {
                if !line.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&entry);
                inserted = true;
            }
        }

        if !inserted {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&format!("\n{}\n{}{}\n", START_MARKER, entry, END_MARKER));
        }

        self.write_atomically(|out| out.write_all(output.as_bytes()))?;

        info!("\"{}\" domain name has been blacklisted", domain);
        Ok(true)
    }

    /// Drop the first line mapping `domain`.
    ///
    /// Fails with [`HostsError::NotFound`] and leaves the file untouched if
    /// no line maps it.
    pub fn remove_domain(&self, domain: &str) -> Result<()> {
        let domain = validate_domain(domain)?;
        let content = self.read()?;

        let mut output = String::with_capacity(content.len());
        let mut found = false;

        for line in content.split_inclusive('\n') {
            if !found && line_maps_domain(line, &domain) {
                found = true;
                continue;
            }
            output.push_str(line);
        }

        if !found {
            return Err(HostsError::NotFound(format!(
                "No occurrence of '{}' found in {:?}",
                domain, self.path
            )));
        }

        self.write_atomically(|out| out.write_all(output.as_bytes()))?;

        info!("\"{}\" has been removed from {:?}", domain, self.path);
        Ok(())
    }

    /// Copy the hosts file to `<dir>/hosts_backup`.
    pub fn backup(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.is_dir() {
            return Err(HostsError::NotFound(format!(
                "Backup directory {:?} does not exist",
                dir
            )));
        }
        if !self.path.exists() {
            return Err(HostsError::NotFound(format!(
                "Hosts file {:?} does not exist",
                self.path
            )));
        }

        let destination = dir.join(BACKUP_FILE_NAME);
        fs::copy(&self.path, &destination).map_err(|e| HostsError::file_io(&destination, e))?;

        info!("Backup file is {:?}", destination);
        Ok(destination)
    }

    /// Disable blocking by renaming the hosts file to `hosts~`.
    pub fn suspend(&self) -> Result<()> {
        let suspended = self.suspended_path();
        if suspended.exists() {
            return Err(HostsError::Invalid(format!(
                "Blocking is already suspended ({:?} exists)",
                suspended
            )));
        }
        if !self.path.exists() {
            return Err(HostsError::NotFound(format!(
                "Hosts file {:?} does not exist",
                self.path
            )));
        }

        fs::rename(&self.path, &suspended).map_err(|e| HostsError::file_io(&self.path, e))?;

        info!("Blocking suspended: {:?} renamed to {:?}", self.path, suspended);
        Ok(())
    }

    /// Re-enable blocking by renaming `hosts~` back.
    pub fn resume(&self) -> Result<()> {
        let suspended = self.suspended_path();
        if !suspended.exists() {
            return Err(HostsError::NotFound(format!(
                "Blocking is not suspended ({:?} does not exist)",
                suspended
            )));
        }

        fs::rename(&suspended, &self.path).map_err(|e| HostsError::file_io(&suspended, e))?;

        info!("Blocking resumed: {:?} restored", self.path);
        Ok(())
    }

    /// Inspect the current file.
    pub fn summary(&self) -> Result<HostsSummary> {
        let content = self.read()?;
        let prefix = format!("{} ", BLOCK_IP);

        let generated_on = content.lines().find_map(|line| {
            let rest = line.split("Created on").nth(1)?;
            rest.split_whitespace().next().map(String::from)
        });

        Ok(HostsSummary {
            generated_on,
            blocked_entries: content.lines().filter(|l| l.starts_with(&prefix)).count(),
            custom_domains: custom_block_of(&content).len(),
        })
    }

    /// Write through a temporary file in the same directory, then rename it
    /// over the live file. The original's permissions are kept.
    fn write_atomically<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let parent = parent_dir(&self.path);
        let temp_file = NamedTempFile::new_in(parent).map_err(|e| HostsError::file_io(parent, e))?;

        {
            let mut writer = BufWriter::new(temp_file.as_file());
            write(&mut writer).map_err(|e| HostsError::file_io(temp_file.path(), e))?;
            writer
                .flush()
                .map_err(|e| HostsError::file_io(temp_file.path(), e))?;
        }

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| HostsError::file_io(temp_file.path(), e))?;

        let permissions = fs::metadata(&self.path)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| Permissions::from_mode(DEFAULT_MODE));
        fs::set_permissions(temp_file.path(), permissions)
            .map_err(|e| HostsError::file_io(temp_file.path(), e))?;

        temp_file
            .persist(&self.path)
            .map_err(|e| HostsError::file_io(&self.path, e.error))?;

        // Make the rename itself durable
        if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
            debug!("Could not sync {:?}: {}", parent, e);
        }

        Ok(())
    }
}
