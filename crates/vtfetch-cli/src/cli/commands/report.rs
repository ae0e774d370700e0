//! `vtfetch report <scan-key>` – show the report for a recorded scan.

use anyhow::Result;
use chrono::Local;
use vtfetch_core::api_key;
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::platform::HttpDownloader;
use vtfetch_core::report;
use vtfetch_core::scan_db::ScanDb;

use crate::cli::terminal::print_report;

/// Opening the report is also the trigger point for records flagged
/// `auto_download`, same as the report page the scan plan opens.
pub async fn run_report(db: &ScanDb, cfg: &VtfetchConfig, scan_key: &str) -> Result<()> {
    let api_key = api_key::resolve_api_key(db, cfg, Local::now()).await?;
    let downloads = HttpDownloader::new(cfg.resolve_download_dir());
    let view = report::open_report(db, &downloads, &api_key, scan_key).await?;
    print_report(&view);
    Ok(())
}
