//! `vtfetch usage` – show API usage against the free-tier limits.

use anyhow::Result;
use chrono::Local;
use vtfetch_core::api_key;
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::scan_db::ScanDb;
use vtfetch_core::usage_report::{usage_report, UsageSource};

pub async fn run_usage(db: &ScanDb, cfg: &VtfetchConfig) -> Result<()> {
    let now = Local::now();
    // No key just means no remote numbers; the local estimate still works.
    let api_key = match api_key::resolve_api_key(db, cfg, now).await {
        Ok(key) => Some(key),
        Err(err) => {
            tracing::debug!("usage report without a key: {}", err);
            None
        }
    };

    let report = usage_report(db, api_key.as_deref(), now).await;
    let source = match report.source {
        UsageSource::Remote => "account",
        UsageSource::LocalEstimate => "local estimate",
    };
    println!(
        "API usage ({}, {} tier):",
        source,
        report.access_level.as_str()
    );
    println!("  Daily:   {} / {}", report.daily_used, report.daily_limit);
    println!(
        "  Monthly: {} / {}",
        report.monthly_used, report.monthly_limit
    );
    Ok(())
}
