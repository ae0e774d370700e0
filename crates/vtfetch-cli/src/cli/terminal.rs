//! Terminal implementations of the platform seams.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use vtfetch_core::api::ReportStatus;
use vtfetch_core::api_key;
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::platform::{DownloadService, Notifier, ReportSink};
use vtfetch_core::report::{self, ReportView};
use vtfetch_core::scan_db::ScanDb;

/// Prints notices as `title: message` lines.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str) {
        println!("{title}: {message}");
    }
}

/// Renders the report inline when the workflow opens it.
pub struct TerminalReportSink {
    db: ScanDb,
    config: VtfetchConfig,
    downloads: Arc<dyn DownloadService>,
}

impl TerminalReportSink {
    pub fn new(db: ScanDb, config: VtfetchConfig, downloads: Arc<dyn DownloadService>) -> Self {
        TerminalReportSink {
            db,
            config,
            downloads,
        }
    }
}

#[async_trait]
impl ReportSink for TerminalReportSink {
    async fn open(&self, scan_key: &str, _filename: &str) -> Result<()> {
        let api_key = api_key::resolve_api_key(&self.db, &self.config, Local::now()).await?;
        let view =
            report::open_report(&self.db, self.downloads.as_ref(), &api_key, scan_key).await?;
        print_report(&view);
        Ok(())
    }
}

/// Plain-text rendering of a report view, shared by `fetch` and `report`.
pub fn print_report(view: &ReportView) {
    let record = &view.record;
    println!("Scan {} ({})", view.key, record.filename);
    println!("  URL:       {}", record.url);
    println!("  Submitted: {}", record.timestamp);
    println!("  Scan ID:   {}", record.scan_id);

    match &view.status {
        Some(ReportStatus::Ready(summary)) => {
            println!(
                "  Status:    {} of {} engines flagged this URL",
                summary.positives, summary.total
            );
            if let Some(scan_date) = &summary.scan_date {
                println!("  Scanned:   {}", scan_date);
            }
            if let Some(permalink) = &summary.permalink {
                println!("  Permalink: {}", permalink);
            } else {
                println!("  Permalink: {}", record.permalink);
            }
        }
        Some(ReportStatus::Pending) => {
            println!("  Status:    analysis pending, check again shortly");
            println!("  Permalink: {}", record.permalink);
        }
        Some(ReportStatus::Error(message)) => {
            println!("  Status:    {}", message);
            println!("  Permalink: {}", record.permalink);
        }
        None => {
            println!("  Status:    report unavailable (service unreachable)");
            println!("  Permalink: {}", record.permalink);
        }
    }

    if view.download_started {
        println!("  Download started for {}.", record.filename);
    }
    if record.show_download_button {
        println!("  Download:  vtfetch download {}", view.key);
    }
    if record.show_disregard_button {
        println!("  Disregard: vtfetch download {} --disregard", view.key);
    }
}
