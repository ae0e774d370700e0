use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Local;
use tokio::task::JoinHandle;

use crate::api::ScanAccepted;
use crate::config::VtfetchConfig;
use crate::platform::{DownloadService, Notifier, ReportSink, UrlScanner};
use crate::rate_limit::DenyReason;
use crate::scan_db::{ScanDb, UsageState};

use super::{ScanWorkflow, WorkflowOutcome};

const URL: &str = "https://example.com/pkg.deb";

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

impl RecordingNotifier {
    fn contains(&self, title: &str) -> bool {
        self.notices.lock().unwrap().iter().any(|(t, _)| t == title)
    }

    fn messages_for(&self, title: &str) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == title)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

struct RecordingScanner {
    fail_with: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingScanner {
    fn accepting() -> Self {
        RecordingScanner {
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        RecordingScanner {
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UrlScanner for RecordingScanner {
    async fn submit(&self, api_key: &str, url: &str) -> Result<ScanAccepted> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), url.to_string()));
        if let Some(message) = &self.fail_with {
            bail!("{}", message);
        }
        Ok(ScanAccepted {
            scan_id: "scan-id-1".to_string(),
            permalink: "https://www.virustotal.com/gui/url/abc".to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingDownloads {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl DownloadService for RecordingDownloads {
    async fn start_download(&self, url: &str, filename: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), filename.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingReports {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ReportSink for RecordingReports {
    async fn open(&self, scan_key: &str, filename: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((scan_key.to_string(), filename.to_string()));
        Ok(())
    }
}

fn test_config(download_automatically: bool, always_show_report: bool) -> VtfetchConfig {
    VtfetchConfig {
        api_key: Some("test-key".to_string()),
        download_automatically,
        always_show_report,
        ..VtfetchConfig::default()
    }
}

struct Setup {
    db: ScanDb,
    scanner: Arc<RecordingScanner>,
    notifier: Arc<RecordingNotifier>,
    downloads: Arc<RecordingDownloads>,
    reports: Arc<RecordingReports>,
    workflow: ScanWorkflow,
}

async fn setup_with(config: VtfetchConfig, scanner: RecordingScanner) -> Setup {
    let db = ScanDb::open_memory().await.unwrap();
    let scanner = Arc::new(scanner);
    let notifier = Arc::new(RecordingNotifier::default());
    let downloads = Arc::new(RecordingDownloads::default());
    let reports = Arc::new(RecordingReports::default());
    let workflow = ScanWorkflow::new(
        db.clone(),
        config,
        Arc::clone(&scanner) as Arc<dyn UrlScanner>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&downloads) as Arc<dyn DownloadService>,
        Arc::clone(&reports) as Arc<dyn ReportSink>,
    );
    Setup {
        db,
        scanner,
        notifier,
        downloads,
        reports,
        workflow,
    }
}

async fn setup(config: VtfetchConfig) -> Setup {
    setup_with(config, RecordingScanner::accepting()).await
}

fn submitted(outcome: WorkflowOutcome) -> (String, bool, Option<JoinHandle<()>>) {
    match outcome {
        WorkflowOutcome::Submitted {
            scan_key,
            report_opened,
            download,
            ..
        } => (scan_key, report_opened, download),
        other => panic!("expected Submitted, got {other:?}"),
    }
}

#[tokio::test]
async fn scan_only_records_and_notifies() {
    let s = setup(test_config(false, false)).await;

    let (scan_key, report_opened, download) = submitted(s.workflow.run(URL).await);
    assert!(!report_opened);
    assert!(download.is_none());

    let calls = s.scanner.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("test-key".to_string(), URL.to_string())]);

    let record = s.db.get_scan(&scan_key).await.unwrap().unwrap();
    assert_eq!(record.filename, "pkg.deb");
    assert_eq!(record.scan_id, "scan-id-1");
    assert!(!record.auto_download);
    assert!(!record.show_download_button);
    assert!(!record.show_disregard_button);

    let usage = s.db.load_usage().await.unwrap().unwrap();
    assert_eq!(usage.daily_count, 1);
    assert_eq!(usage.monthly_count, 1);
    assert_eq!(usage.requests.len(), 1);

    assert!(s.downloads.calls.lock().unwrap().is_empty());
    assert!(s.reports.calls.lock().unwrap().is_empty());
    let notices = s.notifier.notices.lock().unwrap().clone();
    assert_eq!(
        notices.first().unwrap(),
        &("VirusTotal".to_string(), "Scanning URL...".to_string())
    );
    assert_eq!(
        notices.last().unwrap(),
        &(
            "VirusTotal".to_string(),
            "Scan complete. Check scan history for the download option.".to_string()
        )
    );
}

#[tokio::test]
async fn review_plan_marks_flags_and_opens_report() {
    let s = setup(test_config(false, true)).await;

    let (scan_key, report_opened, download) = submitted(s.workflow.run(URL).await);
    assert!(report_opened);
    assert!(download.is_none());

    let record = s.db.get_scan(&scan_key).await.unwrap().unwrap();
    assert!(record.show_download_button);
    assert!(record.show_disregard_button);
    assert!(!record.auto_download);

    let reports = s.reports.calls.lock().unwrap().clone();
    assert_eq!(reports, vec![(scan_key, "pkg.deb".to_string())]);
    assert!(s.downloads.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn auto_download_report_plan_never_downloads_directly() {
    let s = setup(test_config(true, true)).await;

    let (scan_key, report_opened, download) = submitted(s.workflow.run(URL).await);
    assert!(report_opened);
    assert!(download.is_none());

    let record = s.db.get_scan(&scan_key).await.unwrap().unwrap();
    assert!(record.auto_download);
    assert!(!record.show_download_button);

    assert_eq!(s.reports.calls.lock().unwrap().len(), 1);
    assert!(s.downloads.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn auto_download_only_waits_the_grace_period() {
    let s = setup(test_config(true, false)).await;
    // Pause only after setup: opening the SQLite connection needs real time,
    // or the paused clock auto-advances past the pool's acquire timeout.
    tokio::time::pause();

    let (_, report_opened, download) = submitted(s.workflow.run(URL).await);
    assert!(!report_opened);
    let task = download.expect("plan should hand back the download task");
    assert!(s.downloads.calls.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert!(s.downloads.calls.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    let downloads = s.downloads.calls.lock().unwrap().clone();
    assert_eq!(downloads, vec![(URL.to_string(), "pkg.deb".to_string())]);
    assert!(s.reports.calls.lock().unwrap().is_empty());
    assert!(s
        .notifier
        .messages_for("VirusTotal")
        .contains(&"Auto-download started for: pkg.deb".to_string()));
    task.await.unwrap();
}

// Mirrors the binary: a multi-thread runtime that is dropped as soon as
// the command returns. The transfer must land inside `block_on`, through
// the handle `run` surfaces, or teardown aborts it mid-sleep.
#[test]
fn grace_download_completes_before_runtime_shutdown() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    let downloads = runtime.block_on(async {
        let s = setup(test_config(true, false)).await;
        let (_, _, download) = submitted(s.workflow.run(URL).await);
        download
            .expect("plan should hand back the download task")
            .await
            .unwrap();
        let calls = s.downloads.calls.lock().unwrap().clone();
        calls
    });
    drop(runtime);

    assert_eq!(downloads, vec![(URL.to_string(), "pkg.deb".to_string())]);
}

#[tokio::test]
async fn fresh_defaults_run_the_scan_only_plan() {
    let s = setup(VtfetchConfig {
        api_key: Some("test-key".to_string()),
        ..VtfetchConfig::default()
    })
    .await;

    let (_, report_opened, download) = submitted(s.workflow.run(URL).await);
    assert!(!report_opened);
    assert!(download.is_none());
    assert!(s.reports.calls.lock().unwrap().is_empty());
    assert!(s
        .notifier
        .messages_for("VirusTotal")
        .contains(&"Scan complete. Check scan history for the download option.".to_string()));
}

#[tokio::test]
async fn denied_submission_never_reaches_the_scanner() {
    let s = setup(test_config(false, false)).await;

    let now = Local::now();
    let now_ms = now.timestamp_millis();
    let mut state = UsageState::fresh(now);
    state.requests = vec![now_ms - 4_000, now_ms - 3_000, now_ms - 2_000, now_ms - 1_000];
    state.daily_count = 4;
    state.monthly_count = 4;
    s.db.save_usage(&state).await.unwrap();

    match s.workflow.run(URL).await {
        WorkflowOutcome::Denied(DenyReason::WindowFull { .. }) => {}
        other => panic!("expected window denial, got {other:?}"),
    }

    assert!(s.scanner.calls.lock().unwrap().is_empty());
    assert!(s.db.list_scans().await.unwrap().is_empty());
    let denials = s.notifier.messages_for("Rate Limit Exceeded");
    assert_eq!(denials.len(), 1);
    assert!(denials[0].starts_with("Rate limit exceeded."));
}

#[tokio::test]
async fn missing_key_aborts_before_recording_usage() {
    let s = setup(VtfetchConfig {
        api_key: None,
        ..VtfetchConfig::default()
    })
    .await;

    match s.workflow.run(URL).await {
        WorkflowOutcome::ConfigError(message) => {
            assert!(message.contains("VirusTotal API key"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }

    assert!(s.scanner.calls.lock().unwrap().is_empty());
    assert!(s.db.load_usage().await.unwrap().is_none());
    assert!(s.notifier.contains("API Key Required"));
}

#[tokio::test]
async fn submit_failure_keeps_the_usage_slot() {
    let s = setup_with(
        test_config(false, false),
        RecordingScanner::failing("Invalid API key"),
    )
    .await;

    match s.workflow.run(URL).await {
        WorkflowOutcome::SubmitFailed(message) => {
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("expected SubmitFailed, got {other:?}"),
    }

    let usage = s.db.load_usage().await.unwrap().unwrap();
    assert_eq!(usage.daily_count, 1);
    assert!(s.db.list_scans().await.unwrap().is_empty());
    assert!(s.notifier.contains("VirusTotal Error"));
}
