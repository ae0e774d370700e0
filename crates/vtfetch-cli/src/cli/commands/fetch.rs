//! `vtfetch fetch <url>` – scan a URL and run the configured plan.

use std::sync::Arc;

use anyhow::{bail, Result};
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::platform::{
    DownloadService, HttpDownloader, Notifier, ReportSink, UrlScanner, VtScanner,
};
use vtfetch_core::scan_db::ScanDb;
use vtfetch_core::workflow::{ScanWorkflow, WorkflowOutcome};

use crate::cli::terminal::{TerminalNotifier, TerminalReportSink};

/// Runs the scan workflow. The two overrides replace the config pair for
/// this invocation only; notices land on stdout via [`TerminalNotifier`].
pub async fn run_fetch(
    db: &ScanDb,
    cfg: &VtfetchConfig,
    url: &str,
    download_override: Option<bool>,
    report_override: Option<bool>,
) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(download) = download_override {
        cfg.download_automatically = download;
    }
    if let Some(report) = report_override {
        cfg.always_show_report = report;
    }

    let downloads: Arc<dyn DownloadService> =
        Arc::new(HttpDownloader::new(cfg.resolve_download_dir()));
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let reports: Arc<dyn ReportSink> = Arc::new(TerminalReportSink::new(
        db.clone(),
        cfg.clone(),
        Arc::clone(&downloads),
    ));
    let workflow = ScanWorkflow::new(
        db.clone(),
        cfg,
        Arc::new(VtScanner) as Arc<dyn UrlScanner>,
        notifier,
        Arc::clone(&downloads),
        reports,
    );

    // Failure details were already shown as notices; the error here sets
    // the exit code for scripts.
    match workflow.run(url).await {
        WorkflowOutcome::Submitted {
            scan_key, download, ..
        } => {
            println!("Recorded as {scan_key}.");
            // The transfer fires after the grace period; exiting before it
            // finishes would abort it with the runtime.
            if let Some(task) = download {
                task.await?;
            }
            Ok(())
        }
        WorkflowOutcome::Denied(_) => bail!("not submitted (rate limited)"),
        WorkflowOutcome::ConfigError(_) => bail!("not submitted (no usable API key)"),
        WorkflowOutcome::SubmitFailed(_) => bail!("not submitted (scan request failed)"),
    }
}
