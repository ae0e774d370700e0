//! Scan submission policy engine.
//!
//! Turns the `download_automatically` / `always_show_report` pair into one
//! of four plans, then drives a submission through rate check, key
//! resolution, usage recording, the remote call, and the plan's aftermath.

mod plan;
mod run;

#[cfg(test)]
mod tests;

pub use plan::WorkflowPlan;
pub use run::{ScanWorkflow, WorkflowOutcome};
