//! The SZZ orchestration layer: bug-fix classification, the shared
//! diff→extract→blame→aggregate path, and temporal suspect filtering.
//!
//! Two modes share all parsing and aggregation code and differ only in how
//! fixes are selected and whether results are filtered against an issue's
//! creation time:
//! - [`run_heuristic`] — keyword policy, first five fixes, raw candidates;
//! - [`run_issue_aware`] — pattern policy, every fix, suspects only.

mod classify;
mod pipeline;
mod suspect;

pub use classify::{is_keyword_bug_fix, FixPattern};
pub use pipeline::{
    run_heuristic, run_issue_aware, AnalysisFailure, FixAnalysis, HeuristicReport, IssueReport,
    IssueSkip, SzzOptions,
};
pub use suspect::{filter_by_issue_time, issue_epoch};
