//! VirusTotal API client: URL submission, report status, account quotas.
//!
//! Transport uses the curl crate (libcurl) driven through `spawn_blocking`;
//! response parsing is pure functions over the body bytes, tested without
//! the network.

mod http;

pub mod quota;
pub mod report;
pub mod submit;

pub use quota::{fetch_quota, QuotaInfo};
pub use report::{fetch_report, ReportStatus, ReportSummary};
pub use submit::{submit_url, ScanAccepted};

pub(crate) const SCAN_ENDPOINT: &str = "https://www.virustotal.com/vtapi/v2/url/scan";
pub(crate) const REPORT_ENDPOINT: &str = "https://www.virustotal.com/vtapi/v2/url/report";
pub(crate) const USER_QUOTA_ENDPOINT: &str = "https://www.virustotal.com/api/v3/users";
