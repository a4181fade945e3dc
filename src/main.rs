//! hostsmate - hosts file based ad and tracker blocker.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostsmate::cli::{Cli, Commands};
use hostsmate::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config.as_path();

    match cli.command {
        Commands::Init { force } => commands::init::run(config, force),
        Commands::Update => commands::update::run(config).await,
        Commands::AddSource { kind, url } => commands::source::add(config, kind, &url),
        Commands::RemoveSource { kind, url } => commands::source::remove(config, kind, &url),
        Commands::ListSources { kind } => commands::source::list(config, kind),
        Commands::AddDomain { domain } => commands::domain::add(config, &domain),
        Commands::RemoveDomain { domain } => commands::domain::remove(config, &domain),
        Commands::Backup { dir } => commands::backup::run(config, &dir),
        Commands::Suspend => commands::suspend::suspend(config),
        Commands::Resume => commands::suspend::resume(config),
        Commands::Autorun { action } => commands::autorun::run(action, config),
        Commands::Status => commands::status::run(config),
    }
}
