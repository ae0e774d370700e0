//! Persistent scan/usage database (SQLite via sqlx).
//!
//! Stores scan records keyed by `scan_<epoch-ms>`, the single-row free-tier
//! usage counters, and the session-unlocked API key.

pub mod db;
pub mod types;

mod scans;
mod temp_key;
mod usage;


pub use db::*;
pub use types::*;
