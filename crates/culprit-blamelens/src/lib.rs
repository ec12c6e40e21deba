//! Blame-side half of the SZZ correlation.
//!
//! Parses full-metadata blame text into attribution records, matches them
//! against the pre-image line numbers a fix rewrote, and unions the per-file
//! candidate sets into one candidate set per bug-fix commit.

mod correlate;
mod parser;

pub use correlate::{aggregate_candidates, candidate_commits, RecencyPolicy};
pub use parser::{parse_blame, BlameRecord};
