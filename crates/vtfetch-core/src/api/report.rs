//! Scan report status (v2 `/url/report`).

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::http;
use super::REPORT_ENDPOINT;

/// Where a submitted scan stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// Analysis finished; detection counts are available.
    Ready(ReportSummary),
    /// Still queued or analyzing; ask again later.
    Pending,
    /// The service could not produce a report (carries its message).
    Error(String),
}

/// Detection counts for a finished analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub positives: u32,
    pub total: u32,
    pub scan_date: Option<String>,
    pub permalink: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    response_code: Option<i64>,
    positives: Option<u32>,
    total: Option<u32>,
    scan_date: Option<String>,
    permalink: Option<String>,
    verbose_msg: Option<String>,
}

/// Fetch the report for `resource` (the originally submitted URL).
///
/// `scan=1` asks the service to queue a scan if it has never seen the
/// resource. Transport failures are errors; callers degrade to showing
/// the stored record without detection counts.
pub async fn fetch_report(api_key: &str, resource: &str) -> Result<ReportStatus> {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("apikey", api_key)
        .append_pair("resource", resource)
        .append_pair("scan", "1")
        .finish();
    let endpoint = format!("{}?{}", REPORT_ENDPOINT, query);

    let response = tokio::task::spawn_blocking(move || http::get(&endpoint, &[]))
        .await
        .context("report task join")??;

    if !response.is_success() {
        bail!("report request returned HTTP {}", response.status);
    }

    parse_report_body(&response.body)
}

pub(crate) fn parse_report_body(body: &[u8]) -> Result<ReportStatus> {
    let parsed: ReportResponse = serde_json::from_slice(body).context("parse report response")?;
    match parsed.response_code {
        Some(1) => Ok(ReportStatus::Ready(ReportSummary {
            positives: parsed.positives.unwrap_or(0),
            total: parsed.total.unwrap_or(0),
            scan_date: parsed.scan_date,
            permalink: parsed.permalink,
        })),
        Some(0) => Ok(ReportStatus::Pending),
        _ => Ok(ReportStatus::Error(
            parsed
                .verbose_msg
                .unwrap_or_else(|| "Unable to retrieve scan report".to_string()),
        )),
    }
}
