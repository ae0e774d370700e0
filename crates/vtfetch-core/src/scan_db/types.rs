//! Types used by the scan/usage database.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// One submitted scan, as recorded at submission time.
///
/// The identity fields are immutable once written; the three flags are set
/// afterwards by the policy engine depending on the active plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord {
    pub filename: String,
    pub url: String,
    pub scan_id: String,
    pub permalink: String,
    /// RFC 3339 UTC, millisecond precision (sortable as text).
    pub timestamp: String,
    pub auto_download: bool,
    pub show_download_button: bool,
    pub show_disregard_button: bool,
}

impl ScanRecord {
    /// A fresh record with no flags set.
    pub fn new(
        filename: impl Into<String>,
        url: impl Into<String>,
        scan_id: impl Into<String>,
        permalink: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            scan_id: scan_id.into(),
            permalink: permalink.into(),
            timestamp: timestamp.into(),
            auto_download: false,
            show_download_button: false,
            show_disregard_button: false,
        }
    }
}

/// A scan record together with its store key, as listed by `history`.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub key: String,
    pub record: ScanRecord,
}

/// Free-tier usage counters.
///
/// `requests` holds epoch-millisecond timestamps and is pruned to the
/// sliding window by the limiter; the two counters only ever reset on
/// calendar boundaries, tracked by the `last_reset_*` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageState {
    pub requests: Vec<i64>,
    pub daily_count: u32,
    pub monthly_count: u32,
    /// Local calendar date (`%Y-%m-%d`) of the last daily reset.
    pub last_reset_day: String,
    /// Local `%Y-%m` of the last monthly reset.
    pub last_reset_month: String,
}

impl UsageState {
    /// The state a new (or unreadable) store loads as: empty window, zero
    /// counters, reset markers anchored at `now`.
    pub fn fresh(now: DateTime<Local>) -> Self {
        Self {
            requests: Vec::new(),
            daily_count: 0,
            monthly_count: 0,
            last_reset_day: day_key(now),
            last_reset_month: month_key(now),
        }
    }

    /// Zero the counters whose calendar period has rolled over since the
    /// last reset. Returns whether anything changed (callers persist then).
    pub fn apply_calendar_resets(&mut self, now: DateTime<Local>) -> bool {
        let mut changed = false;
        let day = day_key(now);
        if self.last_reset_day != day {
            self.daily_count = 0;
            self.last_reset_day = day;
            changed = true;
        }
        let month = month_key(now);
        if self.last_reset_month != month {
            self.monthly_count = 0;
            self.last_reset_month = month;
            changed = true;
        }
        changed
    }
}

/// API key unlocked from a file for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempApiKey {
    pub api_key: String,
    pub stored_at_ms: i64,
}

/// Local calendar date marker, e.g. `2026-08-24`.
pub fn day_key(t: DateTime<Local>) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// Local calendar month marker, e.g. `2026-08`.
pub fn month_key(t: DateTime<Local>) -> String {
    t.format("%Y-%m").to_string()
}

/// Fixed-width RFC 3339 UTC timestamp for scan records.
///
/// Millisecond precision with a `Z` suffix, so lexicographic order on the
/// stored text matches chronological order.
pub fn rfc3339_millis(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
