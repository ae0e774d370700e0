//! Pure limiter arithmetic over an in-memory [`UsageState`].
//!
//! No clock and no store here: callers pass `now` and persist afterwards,
//! which keeps every check deterministic under test.

use std::time::Duration;

use super::decision::{DenyReason, RateDecision};
use super::{FREE_DAILY_LIMIT, FREE_MONTHLY_LIMIT, MIN_SPACING_MS, WINDOW_MAX_REQUESTS, WINDOW_MS};
use crate::scan_db::UsageState;

/// Drop window entries older than [`WINDOW_MS`].
pub fn prune_window(state: &mut UsageState, now_ms: i64) {
    state.requests.retain(|&t| now_ms - t < WINDOW_MS);
}

/// Run the four ordered checks against an already-pruned state.
///
/// Order is fixed: sliding window, then spacing, then daily, then monthly;
/// the first failure wins.
pub fn evaluate(state: &UsageState, now_ms: i64) -> RateDecision {
    if state.requests.len() >= WINDOW_MAX_REQUESTS {
        if let Some(&oldest) = state.requests.iter().min() {
            let wait = WINDOW_MS - (now_ms - oldest);
            if wait > 0 {
                return RateDecision::Denied(DenyReason::WindowFull {
                    wait: Duration::from_millis(wait as u64),
                });
            }
        }
    }

    if let Some(&newest) = state.requests.iter().max() {
        let since = now_ms - newest;
        if since < MIN_SPACING_MS {
            return RateDecision::Denied(DenyReason::TooSoon {
                wait: Duration::from_millis((MIN_SPACING_MS - since) as u64),
            });
        }
    }

    if state.daily_count >= FREE_DAILY_LIMIT {
        return RateDecision::Denied(DenyReason::DailyQuota);
    }

    if state.monthly_count >= FREE_MONTHLY_LIMIT {
        return RateDecision::Denied(DenyReason::MonthlyQuota);
    }

    RateDecision::Allowed
}

/// Account one allowed submission: append to the window, bump both
/// counters, prune. Counts the attempt whether or not it later succeeds.
pub fn record_request(state: &mut UsageState, now_ms: i64) {
    state.requests.push(now_ms);
    state.daily_count += 1;
    state.monthly_count += 1;
    prune_window(state, now_ms);
}
