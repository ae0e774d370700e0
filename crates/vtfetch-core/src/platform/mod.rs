//! Seams to the surrounding environment.
//!
//! The scan workflow talks to the outside world (user notices, downloads,
//! the report view, the remote scanner) through these traits so the CLI
//! can plug in real implementations and tests can record calls instead.

mod http_download;

pub use http_download::HttpDownloader;

use anyhow::Result;
use async_trait::async_trait;

use crate::api::{self, ScanAccepted};

/// Short user-facing notices (the CLI prints them as lines).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Fetches a URL into the user's download area.
#[async_trait]
pub trait DownloadService: Send + Sync {
    async fn start_download(&self, url: &str, filename: &str) -> Result<()>;
}

/// Opens the report view for a stored scan.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn open(&self, scan_key: &str, filename: &str) -> Result<()>;
}

/// Remote URL submission.
#[async_trait]
pub trait UrlScanner: Send + Sync {
    async fn submit(&self, api_key: &str, url: &str) -> Result<ScanAccepted>;
}

/// Production scanner: the VirusTotal v2 submission endpoint.
#[derive(Debug, Default)]
pub struct VtScanner;

#[async_trait]
impl UrlScanner for VtScanner {
    async fn submit(&self, api_key: &str, url: &str) -> Result<ScanAccepted> {
        api::submit_url(api_key, url).await
    }
}
