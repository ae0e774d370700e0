//! CLI command handlers. Each command is in its own file for clarity.

mod cleanup;
mod completions;
mod download;
mod fetch;
mod history;
mod remove;
mod report;
mod unlock_key;
mod usage;

pub use cleanup::run_cleanup;
pub use completions::run_completions;
pub use download::run_download;
pub use fetch::run_fetch;
pub use history::run_history;
pub use remove::run_remove;
pub use report::run_report;
pub use unlock_key::run_unlock_key;
pub use usage::run_usage;
