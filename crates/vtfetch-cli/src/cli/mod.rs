//! CLI for the vtfetch scan-gated fetcher.

mod commands;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use vtfetch_core::config;
use vtfetch_core::scan_db::ScanDb;

use commands::{
    run_cleanup, run_completions, run_download, run_fetch, run_history, run_remove, run_report,
    run_unlock_key, run_usage,
};

/// Top-level CLI for the vtfetch scan-gated fetcher.
#[derive(Debug, Parser)]
#[command(name = "vtfetch")]
#[command(about = "vtfetch: VirusTotal-gated URL fetching", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan a URL and apply the configured download/report plan.
    Fetch {
        /// Direct HTTP/HTTPS URL to scan.
        url: String,

        /// Download automatically this time, whatever the config says.
        #[arg(long, overrides_with = "no_download")]
        download: bool,

        /// Do not download automatically this time.
        #[arg(long = "no-download", overrides_with = "download")]
        no_download: bool,

        /// Open the report this time, whatever the config says.
        #[arg(long, overrides_with = "no_report")]
        report: bool,

        /// Do not open the report this time.
        #[arg(long = "no-report", overrides_with = "report")]
        no_report: bool,
    },

    /// List recorded scans, newest first.
    History,

    /// Show API usage against the daily and monthly limits.
    Usage,

    /// Show the report for a recorded scan.
    Report {
        /// Scan key (`scan_<ms>`), as printed by fetch and history.
        scan_key: String,
    },

    /// Download the file a recorded scan points at.
    Download {
        /// Scan key (`scan_<ms>`).
        scan_key: String,

        /// Drop the record instead of downloading.
        #[arg(long)]
        disregard: bool,
    },

    /// Remove a scan record.
    Remove {
        /// Scan key (`scan_<ms>`).
        scan_key: String,
    },

    /// Unlock the API key from a key file for this session.
    UnlockKey {
        /// Path to the file holding the key.
        path: PathBuf,
    },

    /// Remove scan records older than the configured retention.
    Cleanup {
        /// Keep running and sweep every hour.
        #[arg(long)]
        watch: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Collapse a `--x` / `--no-x` pair into an override, `None` meaning
/// "use the config value".
fn flag_override(yes: bool, no: bool) -> Option<bool> {
    if yes {
        Some(true)
    } else if no {
        Some(false)
    } else {
        None
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Completions need neither config nor the store.
        if let CliCommand::Completions { shell } = &cli.command {
            run_completions(*shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = ScanDb::open_default().await?;

        match cli.command {
            CliCommand::Fetch {
                url,
                download,
                no_download,
                report,
                no_report,
            } => {
                run_fetch(
                    &db,
                    &cfg,
                    &url,
                    flag_override(download, no_download),
                    flag_override(report, no_report),
                )
                .await?;
            }
            CliCommand::History => run_history(&db).await?,
            CliCommand::Usage => run_usage(&db, &cfg).await?,
            CliCommand::Report { scan_key } => run_report(&db, &cfg, &scan_key).await?,
            CliCommand::Download {
                scan_key,
                disregard,
            } => run_download(&db, &cfg, &scan_key, disregard).await?,
            CliCommand::Remove { scan_key } => run_remove(&db, &scan_key).await?,
            CliCommand::UnlockKey { path } => run_unlock_key(&db, &path).await?,
            CliCommand::Cleanup { watch } => run_cleanup(&db, &cfg, watch).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
