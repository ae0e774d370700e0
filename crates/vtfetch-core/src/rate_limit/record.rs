//! Usage recording, run between an allowance and the network submission.

use chrono::{DateTime, Local};

use super::check::load_or_fresh;
use super::evaluate::record_request;
use crate::config::AccessLevel;
use crate::scan_db::ScanDb;

/// Consume one slot of the free-tier allowance at `now`.
///
/// Premium access records nothing. Persistence failures are logged and
/// swallowed, matching the limiter's best-effort handling.
pub async fn record_usage(db: &ScanDb, access: AccessLevel, now: DateTime<Local>) {
    if access == AccessLevel::Premium {
        return;
    }

    let mut state = load_or_fresh(db, now).await;
    record_request(&mut state, now.timestamp_millis());

    if let Err(err) = db.save_usage(&state).await {
        tracing::warn!("failed to persist usage record: {:#}", err);
    }
}
