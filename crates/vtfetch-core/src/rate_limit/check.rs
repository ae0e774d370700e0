//! Limiter orchestration: load state, reset, prune, persist, evaluate.

use chrono::{DateTime, Local};

use super::decision::RateDecision;
use super::evaluate::{evaluate, prune_window};
use crate::config::AccessLevel;
use crate::scan_db::{ScanDb, UsageState};

/// Gate one submission attempt at `now`.
///
/// Never fails: an unreadable store behaves like a fresh one, and a failed
/// save is logged and swallowed.
pub async fn check_rate_limit(
    db: &ScanDb,
    access: AccessLevel,
    now: DateTime<Local>,
) -> RateDecision {
    if access == AccessLevel::Premium {
        return RateDecision::Allowed;
    }

    let mut state = load_or_fresh(db, now).await;
    let reset = state.apply_calendar_resets(now);
    let now_ms = now.timestamp_millis();
    prune_window(&mut state, now_ms);

    if reset {
        // Calendar resets stick even when the verdict below is a deny.
        if let Err(err) = db.save_usage(&state).await {
            tracing::warn!("failed to persist calendar reset: {:#}", err);
        }
    }

    let decision = evaluate(&state, now_ms);
    if let RateDecision::Denied(reason) = &decision {
        tracing::debug!("submission denied: {}", reason);
    }
    decision
}

/// Load the usage state, falling back to fresh on absence or error.
pub(crate) async fn load_or_fresh(db: &ScanDb, now: DateTime<Local>) -> UsageState {
    match db.load_usage().await {
        Ok(Some(state)) => state,
        Ok(None) => UsageState::fresh(now),
        Err(err) => {
            tracing::warn!("usage state unreadable, starting fresh: {:#}", err);
            UsageState::fresh(now)
        }
    }
}
