//! The four post-submission plans.

/// What happens after a successful submission.
///
/// Decided up front from the two user settings, before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPlan {
    /// Open the report view; the view triggers the download.
    ReportWithAutoDownload,
    /// Download after a short grace period, no report view.
    AutoDownloadOnly,
    /// Open the report view with download/disregard choices.
    ReportForReview,
    /// Record the scan only; downloading stays a manual step.
    ScanOnly,
}

impl WorkflowPlan {
    pub fn from_settings(download_automatically: bool, always_show_report: bool) -> Self {
        match (download_automatically, always_show_report) {
            (true, true) => WorkflowPlan::ReportWithAutoDownload,
            (true, false) => WorkflowPlan::AutoDownloadOnly,
            (false, true) => WorkflowPlan::ReportForReview,
            (false, false) => WorkflowPlan::ScanOnly,
        }
    }

    /// The notice shown when the workflow starts, before the rate check.
    pub fn intent_message(&self) -> &'static str {
        match self {
            WorkflowPlan::ReportWithAutoDownload => "Scanning URL and preparing download...",
            WorkflowPlan::AutoDownloadOnly => "Scanning and auto-downloading...",
            WorkflowPlan::ReportForReview => "Scanning URL for review...",
            WorkflowPlan::ScanOnly => "Scanning URL...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_map_to_plans() {
        assert_eq!(
            WorkflowPlan::from_settings(true, true),
            WorkflowPlan::ReportWithAutoDownload
        );
        assert_eq!(
            WorkflowPlan::from_settings(true, false),
            WorkflowPlan::AutoDownloadOnly
        );
        assert_eq!(
            WorkflowPlan::from_settings(false, true),
            WorkflowPlan::ReportForReview
        );
        assert_eq!(
            WorkflowPlan::from_settings(false, false),
            WorkflowPlan::ScanOnly
        );
    }
}
