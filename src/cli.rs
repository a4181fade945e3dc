//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::autorun::DEFAULT_INTERVAL;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::sources::SourceKind;

#[derive(Parser)]
#[command(name = "hostsmate")]
#[command(author, version, about = "Hosts file based ad and tracker blocker")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Fetch all sources and rebuild the hosts file
    Update,

    /// Add a blacklist or whitelist source URL
    AddSource {
        /// Source list to modify
        #[arg(value_enum)]
        kind: SourceKind,
        /// HTTPS URL of the source
        url: String,
    },

    /// Remove a blacklist or whitelist source URL
    RemoveSource {
        /// Source list to modify
        #[arg(value_enum)]
        kind: SourceKind,
        /// URL to remove
        url: String,
    },

    /// List configured source URLs
    ListSources {
        /// Source list to show
        #[arg(value_enum)]
        kind: SourceKind,
    },

    /// Block a domain through the custom domains section
    AddDomain {
        /// Domain or URL to block
        domain: String,
    },

    /// Remove a domain from the hosts file
    RemoveDomain {
        /// Domain or URL to unblock
        domain: String,
    },

    /// Copy the hosts file to <dir>/hosts_backup
    Backup {
        /// Existing directory to write the backup into
        dir: PathBuf,
    },

    /// Suspend blocking (hosts file is renamed to hosts~)
    Suspend,

    /// Resume blocking after a suspend
    Resume,

    /// Manage periodic automatic updates
    Autorun {
        #[command(subcommand)]
        action: AutorunAction,
    },

    /// Show current status
    Status,
}

#[derive(Subcommand)]
pub enum AutorunAction {
    /// Install and start the systemd timer
    Setup {
        /// Update interval (e.g. 12h, 1d)
        #[arg(long, short, default_value = DEFAULT_INTERVAL)]
        interval: String,
    },
    /// Stop the timer and remove its units
    Remove,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_source() {
        let cli = Cli::parse_from([
            "hostsmate",
            "add-source",
            "whitelist",
            "https://example.com/white.txt",
        ]);
        match cli.command {
            Commands::AddSource { kind, url } => {
                assert_eq!(kind, SourceKind::Whitelist);
                assert_eq!(url, "https://example.com/white.txt");
            }
            _ => panic!("expected add-source"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["hostsmate", "update", "--quiet", "--config", "/tmp/c.yaml"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/tmp/c.yaml"));
        assert!(matches!(cli.command, Commands::Update));
    }

    #[test]
    fn test_autorun_default_interval() {
        let cli = Cli::parse_from(["hostsmate", "autorun", "setup"]);
        match cli.command {
            Commands::Autorun {
                action: AutorunAction::Setup { interval },
            } => assert_eq!(interval, DEFAULT_INTERVAL),
            _ => panic!("expected autorun setup"),
        }
    }

    #[test]
    fn test_invalid_source_kind_rejected() {
        assert!(Cli::try_parse_from(["hostsmate", "list-sources", "greylist"]).is_err());
    }
}
