//! Plain single-stream HTTP downloader.
//!
//! Writes the response body to a `.part` file and renames it into place
//! once the transfer finishes. No segmentation, resume, or retry.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::DownloadService;

/// Temporary file suffix used before the final rename.
const TEMP_SUFFIX: &str = ".part";

/// Downloads into a fixed directory, one file per call.
pub struct HttpDownloader {
    download_dir: PathBuf,
}

impl HttpDownloader {
    pub fn new(download_dir: PathBuf) -> Self {
        HttpDownloader { download_dir }
    }
}

#[async_trait]
impl DownloadService for HttpDownloader {
    async fn start_download(&self, url: &str, filename: &str) -> Result<()> {
        let destination = self.download_dir.join(filename);
        if destination.exists() {
            bail!("{} already exists", destination.display());
        }
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .with_context(|| format!("create download dir {}", self.download_dir.display()))?;

        let temp = temp_path(&destination);
        let fetch_url = url.to_string();
        let fetch_temp = temp.clone();
        let outcome = tokio::task::spawn_blocking(move || fetch_to_file(&fetch_url, &fetch_temp))
            .await
            .context("download task join")?;

        match outcome {
            Ok(written) => {
                tokio::fs::rename(&temp, &destination)
                    .await
                    .with_context(|| format!("move {} into place", temp.display()))?;
                info!(
                    "downloaded {} ({} bytes) to {}",
                    url,
                    written,
                    destination.display()
                );
                Ok(())
            }
            Err(err) => {
                let _ = tokio::fs::remove_file(&temp).await;
                Err(err)
            }
        }
    }
}

/// Blocking GET that streams the body into `temp`. Returns bytes written.
fn fetch_to_file(url: &str, temp: &Path) -> Result<u64> {
    let mut file =
        File::create(temp).with_context(|| format!("create temp file {}", temp.display()))?;
    let mut written: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(Duration::from_secs(3600))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(err) => {
                tracing::warn!("download write failed: {}", err);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        bail!("GET {} returned HTTP {}", url, code);
    }
    file.sync_all()
        .with_context(|| format!("sync {}", temp.display()))?;
    Ok(written)
}

/// Path for the temp file: appends `.part` to the final path.
fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
