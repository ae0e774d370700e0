//! Free-tier rate limiting and usage accounting.
//!
//! Four ordered checks gate every submission: the per-minute sliding
//! window, the minimum spacing between requests, the daily cap, and the
//! monthly cap. The first failing check decides the deny reason and wait
//! time. Premium access bypasses everything.
//!
//! Counter updates are read-modify-write with no cross-call lock: two
//! workflows racing the limiter can both pass before either records its
//! usage. The local limits are client-side hygiene; the service enforces
//! the hard quota.

mod check;
mod decision;
mod evaluate;
mod record;


pub use check::check_rate_limit;
pub(crate) use check::load_or_fresh;
pub use decision::{DenyReason, RateDecision};
pub use evaluate::{evaluate, prune_window, record_request};
pub use record::record_usage;

/// Sliding-window length.
pub const WINDOW_MS: i64 = 60_000;
/// Maximum requests inside one window (free tier: 4/min).
pub const WINDOW_MAX_REQUESTS: usize = 4;
/// Minimum gap between consecutive requests.
pub const MIN_SPACING_MS: i64 = 15_000;
/// Free-tier daily request cap.
pub const FREE_DAILY_LIMIT: u32 = 500;
/// Free-tier monthly request cap.
pub const FREE_MONTHLY_LIMIT: u32 = 15_500;
