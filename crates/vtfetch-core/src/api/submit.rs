//! URL scan submission (v2 `/url/scan`).

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::http;
use super::SCAN_ENDPOINT;

/// An accepted submission: the queued analysis handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAccepted {
    pub scan_id: String,
    pub permalink: String,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    response_code: Option<i64>,
    scan_id: Option<String>,
    permalink: Option<String>,
    verbose_msg: Option<String>,
}

/// Submit `target` for scanning.
///
/// A rejection carries the server's verbose message; transport failures
/// and non-2xx statuses are errors too. The caller is expected to have
/// passed the limiter and recorded usage already.
pub async fn submit_url(api_key: &str, target: &str) -> Result<ScanAccepted> {
    let form_body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("apikey", api_key)
        .append_pair("url", target)
        .finish();

    let response = tokio::task::spawn_blocking(move || http::post_form(SCAN_ENDPOINT, &form_body))
        .await
        .context("submit task join")??;

    if !response.is_success() {
        bail!("scan submission returned HTTP {}", response.status);
    }

    parse_scan_response(&response.body)
}

pub(crate) fn parse_scan_response(body: &[u8]) -> Result<ScanAccepted> {
    let parsed: ScanResponse = serde_json::from_slice(body).context("parse scan response")?;
    if parsed.response_code == Some(1) {
        return Ok(ScanAccepted {
            scan_id: parsed.scan_id.unwrap_or_default(),
            permalink: parsed.permalink.unwrap_or_default(),
        });
    }
    bail!(
        "{}",
        parsed.verbose_msg.unwrap_or_else(|| "Scan failed".to_string())
    )
}
