pub mod config;
pub mod logging;

pub mod api;
pub mod api_key;
pub mod cleanup;
pub mod platform;
pub mod rate_limit;
pub mod report;
pub mod scan_db;
pub mod url_model;
pub mod usage_report;
pub mod workflow;
