use crate::error::CulpritError;
use crate::types::CommitMeta;

/// Capability interface over a version-controlled history.
///
/// Both pipeline modes share one diff→extract→blame→aggregate path and are
/// parameterized by this trait instead of a shared repository handle. The
/// production implementation lives in `culprit-history`; tests substitute an
/// in-memory fake.
///
/// Correlation invariant: [`History::diff`] is always invoked with a fix
/// commit and its *first parent*, and [`History::blame`] runs at that same
/// parent. The blame output's second line number (the line in the blamed
/// revision) is only comparable to the diff's recorded pre-image numbers
/// under that pairing; breaking it makes the correlation silently wrong.
pub trait History {
    /// All commits reachable from the current head, newest first.
    fn commits(&self) -> Result<Vec<CommitMeta>, CulpritError>;

    /// Unified diff text between `commit` and `parent`, rendered with zero
    /// context lines, histogram algorithm, and rename detection disabled.
    fn diff(&self, commit: &str, parent: &str) -> Result<String, CulpritError>;

    /// Full per-line blame metadata (`--line-porcelain` format) for `path`
    /// at `revision`.
    fn blame(&self, revision: &str, path: &str) -> Result<String, CulpritError>;

    /// Look up one commit by hash.
    fn resolve(&self, hash: &str) -> Result<CommitMeta, CulpritError>;
}
