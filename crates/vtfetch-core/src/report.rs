//! The report view for a stored scan.
//!
//! Loads the record, asks the service where the analysis stands, and
//! honors the record's download flag. A failed status fetch degrades to
//! the stored record alone.

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::api::{self, ReportStatus};
use crate::platform::DownloadService;
use crate::scan_db::{ScanDb, ScanRecord};

/// Everything the CLI needs to render one scan's report.
#[derive(Debug)]
pub struct ReportView {
    pub key: String,
    pub record: ScanRecord,
    /// `None` when the status fetch failed outright.
    pub status: Option<ReportStatus>,
    pub download_started: bool,
}

/// Open the report for `scan_key`.
///
/// A record flagged `auto_download` starts its download here; the view
/// is the trigger point, same as the history download button.
pub async fn open_report(
    db: &ScanDb,
    downloads: &dyn DownloadService,
    api_key: &str,
    scan_key: &str,
) -> Result<ReportView> {
    let Some(record) = db.get_scan(scan_key).await? else {
        bail!("no scan record for {}", scan_key);
    };

    let status = match api::fetch_report(api_key, &record.url).await {
        Ok(status) => Some(status),
        Err(err) => {
            warn!("report fetch failed for {}: {err:#}", scan_key);
            None
        }
    };

    let download_started = if record.auto_download {
        start_recorded_download(&record, downloads).await
    } else {
        false
    };

    Ok(ReportView {
        key: scan_key.to_string(),
        record,
        status,
        download_started,
    })
}

/// Start the download a record points at. Failures are logged and
/// reported as `false`, never fatal.
pub async fn start_recorded_download(
    record: &ScanRecord,
    downloads: &dyn DownloadService,
) -> bool {
    match downloads.start_download(&record.url, &record.filename).await {
        Ok(()) => {
            info!("download started for {}", record.filename);
            true
        }
        Err(err) => {
            warn!("download failed for {}: {err:#}", record.filename);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeDownloads {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl FakeDownloads {
        fn new(fail: bool) -> Self {
            FakeDownloads {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl DownloadService for FakeDownloads {
        async fn start_download(&self, url: &str, filename: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), filename.to_string()));
            if self.fail {
                bail!("disk full");
            }
            Ok(())
        }
    }

    fn record() -> ScanRecord {
        ScanRecord::new(
            "tool.deb",
            "https://example.com/tool.deb",
            "scan-id",
            "https://example.com/permalink",
            "2026-03-10T09:00:00.000Z",
        )
    }

    #[tokio::test]
    async fn recorded_download_passes_url_and_filename() {
        let downloads = FakeDownloads::new(false);
        assert!(start_recorded_download(&record(), &downloads).await);
        let calls = downloads.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[(
                "https://example.com/tool.deb".to_string(),
                "tool.deb".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn failed_download_reports_false() {
        let downloads = FakeDownloads::new(true);
        assert!(!start_recorded_download(&record(), &downloads).await);
        assert_eq!(downloads.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_record_is_an_error() {
        let db = ScanDb::open_memory().await.unwrap();
        let downloads = FakeDownloads::new(false);
        let err = open_report(&db, &downloads, "key", "scan_42")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no scan record"));
        assert!(downloads.calls.lock().unwrap().is_empty());
    }
}
