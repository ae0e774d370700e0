use std::fmt;
use std::time::Duration;

/// Why a submission was denied, with the wait until it would pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The sliding window already holds the per-minute allowance.
    WindowFull { wait: Duration },
    /// Too soon after the previous request.
    TooSoon { wait: Duration },
    /// Daily cap reached; resets at the next local calendar day.
    DailyQuota,
    /// Monthly cap reached; resets at the next local calendar month.
    MonthlyQuota,
}

impl DenyReason {
    /// Time until the failing check would pass, where one exists.
    /// Calendar-cap denials have no wait (come back after the boundary).
    pub fn wait_time(&self) -> Option<Duration> {
        match self {
            DenyReason::WindowFull { wait } | DenyReason::TooSoon { wait } => Some(*wait),
            DenyReason::DailyQuota | DenyReason::MonthlyQuota => None,
        }
    }
}

fn ceil_secs(wait: Duration) -> u64 {
    wait.as_millis().div_ceil(1000) as u64
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::WindowFull { wait } => {
                write!(f, "Rate limit exceeded. Please wait {} seconds.", ceil_secs(*wait))
            }
            DenyReason::TooSoon { wait } => {
                write!(
                    f,
                    "Please wait {} seconds before next request.",
                    ceil_secs(*wait)
                )
            }
            DenyReason::DailyQuota => {
                write!(f, "Daily quota of 500 requests exceeded. Try again tomorrow.")
            }
            DenyReason::MonthlyQuota => {
                write!(
                    f,
                    "Monthly quota of 15,500 requests exceeded. Try again next month."
                )
            }
        }
    }
}

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The submission may proceed.
    Allowed,
    /// The submission is dropped; nothing is queued or retried.
    Denied(DenyReason),
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}
