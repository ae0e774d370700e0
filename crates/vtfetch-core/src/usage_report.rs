//! Usage numbers for display: remote when the account answers, local
//! counters otherwise.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::api::{self, QuotaInfo};
use crate::config::AccessLevel;
use crate::rate_limit::{self, load_or_fresh};
use crate::scan_db::{ScanDb, UsageState};

/// Where the numbers in a [`UsageReport`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSource {
    /// The account quota endpoint answered.
    Remote,
    /// Local counters; resets applied in memory, nothing persisted.
    LocalEstimate,
}

/// Consumed requests against their limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    pub daily_used: u64,
    pub daily_limit: u64,
    pub monthly_used: u64,
    pub monthly_limit: u64,
    pub access_level: AccessLevel,
    pub source: UsageSource,
}

impl UsageReport {
    fn from_quota(quota: QuotaInfo) -> Self {
        UsageReport {
            daily_used: quota.daily_used,
            daily_limit: quota.daily_limit,
            monthly_used: quota.monthly_used,
            monthly_limit: quota.monthly_limit,
            access_level: quota.access_level,
            source: UsageSource::Remote,
        }
    }

    fn local_estimate(state: &UsageState) -> Self {
        UsageReport {
            daily_used: u64::from(state.daily_count),
            daily_limit: u64::from(rate_limit::FREE_DAILY_LIMIT),
            monthly_used: u64::from(state.monthly_count),
            monthly_limit: u64::from(rate_limit::FREE_MONTHLY_LIMIT),
            access_level: AccessLevel::Free,
            source: UsageSource::LocalEstimate,
        }
    }
}

/// Build the usage report, preferring the remote reconciler.
///
/// The local fallback applies calendar resets to its own copy of the
/// state only; persisted counters are the limiter's business.
pub async fn usage_report(
    db: &ScanDb,
    api_key: Option<&str>,
    now: DateTime<Local>,
) -> UsageReport {
    if let Some(key) = api_key {
        if let Some(quota) = api::fetch_quota(key).await {
            return UsageReport::from_quota(quota);
        }
        debug!("remote quota unavailable, using local counters");
    }
    let mut state = load_or_fresh(db, now).await;
    state.apply_calendar_resets(now);
    UsageReport::local_estimate(&state)
}
