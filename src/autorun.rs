//! Periodic updates through a systemd service + timer pair.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cmd_abstraction::{args_to_strings, run_checked, CommandExecutor};
use crate::error::{HostsError, Result};
use crate::validation::validate_interval;

const SYSTEMD_DIR: &str = "/etc/systemd/system";
const SERVICE_NAME: &str = "hostsmate.service";
const TIMER_NAME: &str = "hostsmate.timer";
const SYSTEMCTL: &str = "systemctl";

/// Interval used when none is given on the command line.
pub const DEFAULT_INTERVAL: &str = "1d";

/// Whether the timer unit exists in the system unit directory.
pub fn timer_installed() -> bool {
    Path::new(SYSTEMD_DIR).join(TIMER_NAME).exists()
}

/// Installs and removes the hostsmate timer.
pub struct Autorun<'a> {
    executor: &'a dyn CommandExecutor,
    unit_dir: PathBuf,
    binary: PathBuf,
    config_path: PathBuf,
}

impl<'a> Autorun<'a> {
    /// Manage units in `/etc/systemd/system`, running `binary` with `config_path`.
    pub fn new(executor: &'a dyn CommandExecutor, binary: PathBuf, config_path: PathBuf) -> Self {
        Self::with_unit_dir(executor, SYSTEMD_DIR, binary, config_path)
    }

    pub fn with_unit_dir<P: Into<PathBuf>>(
        executor: &'a dyn CommandExecutor,
        unit_dir: P,
        binary: PathBuf,
        config_path: PathBuf,
    ) -> Self {
        Self {
            executor,
            unit_dir: unit_dir.into(),
            binary,
            config_path,
        }
    }

    pub fn service_path(&self) -> PathBuf {
        self.unit_dir.join(SERVICE_NAME)
    }

    pub fn timer_path(&self) -> PathBuf {
        self.unit_dir.join(TIMER_NAME)
    }

    pub fn is_installed(&self) -> bool {
        self.timer_path().exists()
    }

    /// Write both units, reload systemd and start the timer.
    pub fn setup(&self, interval: &str) -> Result<()> {
        validate_interval(interval)?;

        let service = self.service_path();
        info!("Creating {:?}...", service);
        write_unit(&service, &generate_service_unit(&self.binary, &self.config_path))?;

        let timer = self.timer_path();
        info!("Creating {:?}...", timer);
        write_unit(&timer, &generate_timer_unit(interval))?;

        info!("Reloading systemd...");
        self.systemctl(&["daemon-reload"])?;

        info!("Enabling {}...", TIMER_NAME);
        self.systemctl(&["enable", "--now", TIMER_NAME])?;

        Ok(())
    }

    /// Stop the timer and delete both units.
    ///
    /// Fails with [`HostsError::NotFound`] only when neither unit exists.
    pub fn remove(&self) -> Result<()> {
        if !self.service_path().exists() && !self.timer_path().exists() {
            return Err(HostsError::NotFound("Autorun is not set up".to_string()));
        }

        // Best effort: the timer may already be stopped or unknown to systemd
        for action in ["stop", "disable"] {
            match self.executor.execute(SYSTEMCTL, &args_to_strings(&[action, TIMER_NAME])) {
                Ok(output) if !output.success => {
                    warn!("systemctl {} {}: {}", action, TIMER_NAME, output.stderr.trim())
                }
                Err(e) => warn!("{}", e),
                Ok(_) => {}
            }
        }

        for path in [self.timer_path(), self.service_path()] {
            if path.exists() {
                info!("Removing {:?}...", path);
                fs::remove_file(&path).map_err(|e| HostsError::file_io(&path, e))?;
            }
        }

        self.systemctl(&["daemon-reload"])?;
        Ok(())
    }

    fn systemctl(&self, args: &[&str]) -> Result<()> {
        run_checked(self.executor, SYSTEMCTL, args).map(|_| ())
    }
}

fn write_unit(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| HostsError::file_io(path, e))
}

/// Generate systemd service unit
fn generate_service_unit(binary: &Path, config_path: &Path) -> String {
    format!(
        r#"[Unit]
Description=hostsmate hosts file update
After=network-online.target
Wants=network-online.target

[Service]
Type=oneshot
ExecStart={} --config {} update --quiet

# Security hardening
NoNewPrivileges=yes
ProtectHome=yes
PrivateTmp=yes
"#,
        binary.display(),
        config_path.display()
    )
}

/// Generate systemd timer unit
fn generate_timer_unit(interval: &str) -> String {
    format!(
        r#"[Unit]
Description=hostsmate periodic hosts file update

[Timer]
OnBootSec=5min
OnUnitActiveSec={}
Persistent=true

[Install]
WantedBy=timers.target
"#,
        interval
    )
}
