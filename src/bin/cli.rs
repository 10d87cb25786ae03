//! Port announcer CLI
//!
//! Local execution entry point, meant to be called by cron or a CI schedule.
//! For AWS Lambda, use `port-announcer-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use port_announcer::{
    config,
    error::Result,
    models::{Config, WEBHOOK_URL_ENV},
    pipeline::{self, RunOutcome},
    storage::{Ledger, LedgerStore, LocalLedgerStore},
};

/// Port announcer - PortMaster new-port notifications
#[derive(Parser, Debug)]
#[command(
    name = "port-announcer",
    version,
    about = "Announces newly published PortMaster ports to a chat webhook"
)]

struct Cli {
    /// Path to storage directory containing config.toml and the ledger
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Webhook endpoint (overrides config.toml)
    #[arg(long, env = "NEWS_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Announce the next new port (or seed the ledger on first run)
    Run,

    /// List ports that have not been announced yet, in announcement order
    Pending,

    /// Print the webhook payload for the next announcement without sending it
    Preview,

    /// Validate configuration
    Validate,

    /// Show ledger info
    Info,

    /// Write a default config.toml into the storage directory
    Init {
        /// Overwrite an existing config.toml
        #[arg(long)]
        force: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = config::load_config(&config_path);
    if let Some(url) = cli.webhook_url.filter(|u| !u.trim().is_empty()) {
        config.webhook.url = url;
    }

    let store = LocalLedgerStore::in_dir(&cli.storage_dir, &config.storage.ledger_file);

    match cli.command {
        Command::Run => match pipeline::run_announcer(&config, &store).await {
            Ok(RunOutcome::Bootstrapped { seeded }) => {
                log::info!("First run: recorded {} existing ports without announcing.", seeded);
            }
            Ok(RunOutcome::Idle { known }) => {
                log::info!("No new ports to announce. {} ports known.", known);
            }
            Ok(RunOutcome::Announced { keys, remaining }) => {
                log::info!("Announced {}. {} still pending.", keys.join(", "), remaining);
            }
            Err(e) => {
                log::error!("Run failed: {}", e);
                return Err(e);
            }
        },

        Command::Pending => {
            let inspection = pipeline::inspect_backlog(&config, &store).await?;
            if inspection.bootstrap {
                log::info!(
                    "No ledger yet: the next run will record all {} ports without announcing.",
                    inspection.catalog.len()
                );
            }
            for key in &inspection.diff.pending {
                let title = inspection
                    .catalog
                    .get(key)
                    .map(|e| e.title.as_str())
                    .unwrap_or_default();
                println!("{key}\t{title}");
            }
            log::info!(
                "{} pending, {} already announced",
                inspection.diff.len(),
                inspection.diff.known
            );
        }

        Command::Preview => match pipeline::preview_announcement(&config, &store).await? {
            Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
            None => log::info!("Nothing would be announced by the next run."),
        },

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            log::info!("✓ Config OK");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!(
                "Config: {}",
                if config_path.exists() {
                    "found"
                } else {
                    "not found (using defaults)"
                }
            );

            let ledger = Ledger::load(&store).await?;
            log::info!("Ledger: {} ({:?})", store.location(), ledger.origin());
            log::info!("Announced ports: {}", ledger.len());
        }

        Command::Init { force } => {
            if config_path.exists() && !force {
                log::warn!(
                    "Config already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
                return Ok(());
            }

            std::fs::create_dir_all(&cli.storage_dir)?;
            std::fs::write(&config_path, Config::default().to_toml()?)?;
            log::info!("Default config written to {}", config_path.display());
            if config.webhook.url.is_empty() {
                log::warn!(
                    "Set webhook.url in {} or export {} before running.",
                    config_path.display(),
                    WEBHOOK_URL_ENV
                );
            }
        }
    }

    Ok(())
}
