//! The submission driver.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api_key;
use crate::config::VtfetchConfig;
use crate::platform::{DownloadService, Notifier, ReportSink, UrlScanner};
use crate::rate_limit::{self, DenyReason, RateDecision};
use crate::scan_db::{rfc3339_millis, ScanDb, ScanRecord};
use crate::url_model;

use super::WorkflowPlan;

/// Grace period before an `AutoDownloadOnly` download starts.
const AUTO_DOWNLOAD_DELAY: Duration = Duration::from_millis(2000);

/// Terminal result of one submission attempt.
#[derive(Debug)]
pub enum WorkflowOutcome {
    /// The limiter refused; nothing was sent or recorded.
    Denied(DenyReason),
    /// No usable API key; nothing was sent.
    ConfigError(String),
    /// The submission failed (transport or service refusal). The usage
    /// slot is already consumed.
    SubmitFailed(String),
    /// Accepted, recorded, and the plan's aftermath carried out.
    Submitted {
        scan_key: String,
        record: ScanRecord,
        report_opened: bool,
        /// Pending grace-period download, when the plan starts one.
        /// Dropping the runtime before awaiting it aborts the transfer.
        download: Option<JoinHandle<()>>,
    },
}

/// One-shot driver for a single URL submission.
///
/// Collaborators come in through the [`crate::platform`] traits; the CLI
/// wires real ones, tests wire recorders.
pub struct ScanWorkflow {
    db: ScanDb,
    config: VtfetchConfig,
    scanner: Arc<dyn UrlScanner>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadService>,
    reports: Arc<dyn ReportSink>,
}

impl ScanWorkflow {
    pub fn new(
        db: ScanDb,
        config: VtfetchConfig,
        scanner: Arc<dyn UrlScanner>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadService>,
        reports: Arc<dyn ReportSink>,
    ) -> Self {
        ScanWorkflow {
            db,
            config,
            scanner,
            notifier,
            downloads,
            reports,
        }
    }

    /// Submit `url`, honoring the limiter and the configured plan.
    pub async fn run(&self, url: &str) -> WorkflowOutcome {
        let plan = WorkflowPlan::from_settings(
            self.config.download_automatically,
            self.config.always_show_report,
        );
        self.notifier.notify("VirusTotal", plan.intent_message());

        let now = Local::now();
        if let RateDecision::Denied(reason) =
            rate_limit::check_rate_limit(&self.db, self.config.access_level, now).await
        {
            self.notifier
                .notify("Rate Limit Exceeded", &reason.to_string());
            return WorkflowOutcome::Denied(reason);
        }

        let api_key = match api_key::resolve_api_key(&self.db, &self.config, now).await {
            Ok(key) => key,
            Err(err) => {
                let message = err.to_string();
                self.notifier.notify("API Key Required", &message);
                return WorkflowOutcome::ConfigError(message);
            }
        };

        // The slot is spent on the attempt, whatever the service says.
        rate_limit::record_usage(&self.db, self.config.access_level, now).await;

        let accepted = match self.scanner.submit(&api_key, url).await {
            Ok(accepted) => accepted,
            Err(err) => {
                let message = format!("{err:#}");
                self.notifier.notify("VirusTotal Error", &message);
                return WorkflowOutcome::SubmitFailed(message);
            }
        };

        let submitted_at = Local::now();
        let scan_key = format!("scan_{}", submitted_at.timestamp_millis());
        let record = ScanRecord::new(
            url_model::scan_filename(url),
            url,
            &accepted.scan_id,
            &accepted.permalink,
            rfc3339_millis(submitted_at.with_timezone(&Utc)),
        );
        if let Err(err) = self.db.insert_scan(&scan_key, &record).await {
            warn!("failed to persist scan record {}: {err:#}", scan_key);
        }
        info!("scan {} accepted for {} ({})", accepted.scan_id, url, scan_key);

        self.finish_plan(plan, scan_key, record).await
    }

    async fn finish_plan(
        &self,
        plan: WorkflowPlan,
        scan_key: String,
        record: ScanRecord,
    ) -> WorkflowOutcome {
        let mut report_opened = false;
        let mut download = None;

        match plan {
            WorkflowPlan::ReportWithAutoDownload => {
                if let Err(err) = self.db.mark_auto_download(&scan_key).await {
                    warn!("failed to flag {} for auto-download: {err:#}", scan_key);
                }
                report_opened = self.open_report(&scan_key, &record.filename).await;
                self.notifier
                    .notify("VirusTotal", "Report opening with auto-download...");
            }
            WorkflowPlan::AutoDownloadOnly => {
                download = Some(self.schedule_download(record.clone()));
            }
            WorkflowPlan::ReportForReview => {
                if let Err(err) = self.db.mark_review_buttons(&scan_key).await {
                    warn!("failed to flag {} for review: {err:#}", scan_key);
                }
                report_opened = self.open_report(&scan_key, &record.filename).await;
                self.notifier
                    .notify("VirusTotal", "Report ready for review with download options.");
            }
            WorkflowPlan::ScanOnly => {
                self.notifier.notify(
                    "VirusTotal",
                    "Scan complete. Check scan history for the download option.",
                );
            }
        }

        WorkflowOutcome::Submitted {
            scan_key,
            record,
            report_opened,
            download,
        }
    }

    async fn open_report(&self, scan_key: &str, filename: &str) -> bool {
        match self.reports.open(scan_key, filename).await {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to open report for {}: {err:#}", scan_key);
                false
            }
        }
    }

    /// Spawns the delayed transfer and hands the task back. The workflow
    /// never waits on it; [`WorkflowOutcome::Submitted`] carries the handle
    /// so the caller can hold the runtime open until it settles.
    fn schedule_download(&self, record: ScanRecord) -> JoinHandle<()> {
        let downloads = Arc::clone(&self.downloads);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            tokio::time::sleep(AUTO_DOWNLOAD_DELAY).await;
            match downloads
                .start_download(&record.url, &record.filename)
                .await
            {
                Ok(()) => notifier.notify(
                    "VirusTotal",
                    &format!("Auto-download started for: {}", record.filename),
                ),
                Err(err) => {
                    warn!("auto-download failed for {}: {err:#}", record.filename);
                    notifier.notify("Download Error", &format!("{err:#}"));
                }
            }
        })
    }
}
