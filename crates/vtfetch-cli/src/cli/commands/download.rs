//! `vtfetch download <scan-key>` – fetch the file a recorded scan points
//! at, or drop the record with --disregard.

use anyhow::{bail, Result};
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::platform::{DownloadService, HttpDownloader};
use vtfetch_core::scan_db::ScanDb;

pub async fn run_download(
    db: &ScanDb,
    cfg: &VtfetchConfig,
    scan_key: &str,
    disregard: bool,
) -> Result<()> {
    if disregard {
        if db.remove_scan(scan_key).await? {
            println!("Disregarded {scan_key}; record removed.");
        } else {
            println!("No scan record for {scan_key}.");
        }
        return Ok(());
    }

    let Some(record) = db.get_scan(scan_key).await? else {
        bail!("no scan record for {}", scan_key);
    };

    let download_dir = cfg.resolve_download_dir();
    let downloads = HttpDownloader::new(download_dir.clone());
    downloads
        .start_download(&record.url, &record.filename)
        .await?;
    println!(
        "Downloaded {} to {}.",
        record.filename,
        download_dir.display()
    );
    Ok(())
}
