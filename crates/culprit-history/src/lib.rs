//! Git-backed implementation of the [`culprit_core::History`] capability.
//!
//! Walks commit history with git2 and fetches diff/blame text through the
//! external `git` client, one blocking subprocess call per request.

mod git;

pub use git::GitHistory;
