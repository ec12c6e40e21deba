//! Diff-side half of the SZZ correlation: comment filtering and change
//! extraction.
//!
//! Turns zero-context unified-diff text into a [`culprit_core::ChangeMap`]
//! of pre-image line numbers, excluding deletions that are pure comment
//! lines.

mod comment;
mod extract;

pub use comment::is_comment_line;
pub use extract::extract_changes;
