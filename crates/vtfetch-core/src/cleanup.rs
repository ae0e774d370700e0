//! Age-based removal of old scan records.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use crate::config::VtfetchConfig;
use crate::scan_db::{rfc3339_millis, ScanDb};

/// Delete scan records older than the configured retention.
///
/// `auto_remove_days` of `"never"` (or anything non-numeric) disables the
/// sweep entirely. Returns the number of records removed.
pub async fn cleanup_old_scans(
    db: &ScanDb,
    config: &VtfetchConfig,
    now: DateTime<Local>,
) -> Result<u64> {
    let Some(days) = config.auto_remove_after_days() else {
        debug!("scan auto-removal disabled");
        return Ok(0);
    };
    let cutoff = rfc3339_millis(now.with_timezone(&Utc) - chrono::Duration::days(i64::from(days)));
    let removed = db.remove_scans_older_than(&cutoff).await?;
    if removed > 0 {
        info!("removed {} scan records older than {} days", removed, days);
    }
    Ok(removed)
}

/// Sweep once immediately, then every hour. Never returns.
pub async fn run_cleanup_watch(db: &ScanDb, config: &VtfetchConfig) {
    let mut ticker = tokio::time::interval(Duration::from_secs(3600));
    loop {
        ticker.tick().await;
        if let Err(err) = cleanup_old_scans(db, config, Local::now()).await {
            warn!("scan cleanup failed: {err:#}");
        }
    }
}
