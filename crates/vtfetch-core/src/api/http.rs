//! Blocking curl helpers shared by the endpoint modules.
//!
//! Runs in the current thread; call from `spawn_blocking` when used from
//! async code.

use anyhow::{Context, Result};
use std::time::Duration;

pub(crate) struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn configured_easy(url: &str) -> Result<curl::easy::Easy> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(30))?;
    Ok(easy)
}

fn perform(mut easy: curl::easy::Easy) -> Result<HttpResponse> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform().context("request failed")?;
    }
    let status = easy.response_code().context("no response code")?;
    Ok(HttpResponse { status, body })
}

/// GET with optional extra headers (e.g. `x-apikey`).
pub(crate) fn get(url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
    let mut easy = configured_easy(url)?;
    if !headers.is_empty() {
        let mut list = curl::easy::List::new();
        for (name, value) in headers {
            list.append(&format!("{}: {}", name, value))?;
        }
        easy.http_headers(list)?;
    }
    perform(easy)
}

/// POST with an `application/x-www-form-urlencoded` body.
pub(crate) fn post_form(url: &str, form_body: &str) -> Result<HttpResponse> {
    let mut easy = configured_easy(url)?;
    easy.post(true)?;
    easy.post_fields_copy(form_body.as_bytes())?;
    perform(easy)
}
