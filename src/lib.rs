//! # hostsmate - Hosts File Ad Blocker
//!
//! Builds the system hosts file from remote blacklists, so that ad, tracker
//! and malware domains resolve to `0.0.0.0`.
//!
//! ## Features
//!
//! - **Concurrent Fetch** - All sources are downloaded in parallel with a bounded pool
//! - **Format Tolerant** - Hosts files, bare domain lists and filter rules are all understood
//! - **Whitelists** - Remote whitelists keep known-good domains out of the result
//! - **Custom Domains** - A user-edited section of the hosts file survives every rebuild
//! - **Atomic Writes** - The live hosts file is only ever replaced by a rename
//! - **Scheduling** - Optional systemd timer for periodic updates
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       hostsmate                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: init, update, add-domain, suspend...       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config + SourceRegistry (serde_yaml)                       │
//! │    └── Blacklist and whitelist source URLs                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls, Transport trait)                │
//! │    └── Bounded concurrent downloads, per-source failures    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Extractor (regex)                                          │
//! │    └── Line parsing, normalization, whitelist filtering     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DomainSet                                                  │
//! │    └── Deduplicated `0.0.0.0 <domain>` entries              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HostsFile (tempfile)                                       │
//! │    └── Header, custom block, entries; atomic replace        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use chrono::Local;
//! use hostsmate::config::Config;
//! use hostsmate::fetcher::Fetcher;
//! use hostsmate::pipeline::run_update;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("/etc/hostsmate/config.yaml")?;
//!     let fetcher = Fetcher::new(&config)?;
//!
//!     let report = run_update(&config, &fetcher, Local::now().date_naive()).await?;
//!     println!("{} domains blocked", report.entries_written);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`autorun`] - systemd service and timer for periodic updates
//! - [`cli`] - Command-line interface definitions
//! - [`cmd_abstraction`] - Mockable execution of external commands
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`domains`] - Deduplicated set of block entries
//! - [`error`] - Library error type
//! - [`extractor`] - Domain extraction and whitelist filtering
//! - [`fetcher`] - HTTP client for downloading sources
//! - [`hosts_file`] - Hosts file rebuild, edits, suspend and backup
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`pipeline`] - The update run
//! - [`sources`] - Blacklist and whitelist source registry
//! - [`utils`] - Common utility functions (formatting, permission checks)
//! - [`validation`] - Domain, URL and interval validation

pub mod autorun;
pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod domains;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod hosts_file;
pub mod lock;
pub mod pipeline;
pub mod sources;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{HostsError, Result};
