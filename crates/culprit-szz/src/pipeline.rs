use std::collections::BTreeSet;

use culprit_blamelens::{aggregate_candidates, RecencyPolicy};
use culprit_core::{Candidate, CommitMeta, CulpritError, History, IssueRecord};
use culprit_diffscan::extract_changes;
use serde::Serialize;

use crate::classify::{is_keyword_bug_fix, FixPattern};
use crate::suspect::filter_by_issue_time;

/// Knobs shared by both pipeline modes.
///
/// # Examples
///
/// ```
/// use culprit_szz::SzzOptions;
/// use culprit_blamelens::RecencyPolicy;
///
/// let options = SzzOptions::default();
/// assert_eq!(options.max_fixes, 5);
/// assert_eq!(options.recency, RecencyPolicy::All);
/// ```
#[derive(Debug, Clone)]
pub struct SzzOptions {
    /// Per-file attribution collapse policy.
    pub recency: RecencyPolicy,
    /// Heuristic mode: how many bug-fix commits to analyze, newest first.
    pub max_fixes: usize,
}

impl Default for SzzOptions {
    fn default() -> Self {
        Self {
            recency: RecencyPolicy::All,
            max_fixes: 5,
        }
    }
}

/// One bug-fix commit's analysis outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixAnalysis {
    /// Hash of the bug-fix commit.
    pub fix_hash: String,
    /// Subject line of the bug-fix commit message.
    pub summary: String,
    /// Issue number the fix references (issue-aware mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<i64>,
    /// Candidate (or, after temporal filtering, suspect) commits.
    pub candidates: Vec<Candidate>,
}

/// A bug-fix commit whose analysis failed and contributed no entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    /// Hash of the bug-fix commit.
    pub fix_hash: String,
    /// What went wrong.
    pub error: String,
}

/// A fix whose referenced issue could not be used for temporal filtering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSkip {
    /// Hash of the bug-fix commit.
    pub fix_hash: String,
    /// The issue number the message referenced, when one parsed at all.
    pub issue_number: Option<i64>,
}

/// Result of a heuristic-mode run: raw candidate sets per bug-fix commit.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicReport {
    /// One entry per analyzed bug-fix commit, newest first.
    pub analyzed: Vec<FixAnalysis>,
    /// Fixes whose analysis aborted.
    pub failures: Vec<AnalysisFailure>,
}

/// Result of an issue-aware run: temporally filtered suspect lists.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    /// One entry per fix whose issue was found in the dataset.
    pub suspects: Vec<FixAnalysis>,
    /// Fixes skipped because their issue was absent (or unparsable).
    pub skipped: Vec<IssueSkip>,
    /// Fixes whose analysis aborted.
    pub failures: Vec<AnalysisFailure>,
}

/// The shared per-commit path: diff against the first parent, extract the
/// changed pre-image lines, and aggregate blame candidates at that parent.
///
/// A fix without a parent has nothing to compare against and contributes an
/// empty set — that is a recorded result, not an error.
fn analyze_fix(
    history: &dyn History,
    fix: &CommitMeta,
    recency: RecencyPolicy,
) -> Result<BTreeSet<Candidate>, CulpritError> {
    let Some(parent) = fix.parents.first() else {
        return Ok(BTreeSet::new());
    };

    let diff_text = history.diff(&fix.hash, parent)?;
    let changes = extract_changes(&diff_text);
    aggregate_candidates(history, parent, &changes, recency)
}

fn subject_line(message: &str) -> String {
    message.lines().next().unwrap_or("").to_string()
}

/// Heuristic mode: analyze the first `max_fixes` keyword-policy bug fixes.
///
/// Commits come newest first from the provider. Each analyzed fix is
/// recorded with its full, unfiltered candidate set; parentless fixes are
/// recorded with an empty one. A failing diff or blame call aborts only
/// that fix's analysis and lands in `failures`.
///
/// # Errors
///
/// Fails only when the commit stream itself cannot be enumerated.
pub fn run_heuristic(
    history: &dyn History,
    options: &SzzOptions,
) -> Result<HeuristicReport, CulpritError> {
    let commits = history.commits()?;

    let mut report = HeuristicReport::default();
    for fix in commits
        .iter()
        .filter(|c| is_keyword_bug_fix(&c.message))
        .take(options.max_fixes)
    {
        match analyze_fix(history, fix, options.recency) {
            Ok(candidates) => report.analyzed.push(FixAnalysis {
                fix_hash: fix.hash.clone(),
                summary: subject_line(&fix.message),
                issue_number: None,
                candidates: candidates.into_iter().collect(),
            }),
            Err(e) => report.failures.push(AnalysisFailure {
                fix_hash: fix.hash.clone(),
                error: e.to_string(),
            }),
        }
    }

    Ok(report)
}

/// Issue-aware mode: analyze *all* pattern-policy fixes and keep only
/// candidates committed strictly before their issue was opened.
///
/// For each fix the issue number is extracted from the message and looked
/// up in `issues`. A hit runs the shared diff/blame path followed by the
/// temporal filter; a miss (or a message whose reference does not parse) is
/// reported as a skip rather than silently dropped. Entries are
/// all-or-nothing per fix.
///
/// # Errors
///
/// Fails only when the commit stream itself cannot be enumerated.
pub fn run_issue_aware(
    history: &dyn History,
    pattern: &FixPattern,
    issues: &[IssueRecord],
    options: &SzzOptions,
) -> Result<IssueReport, CulpritError> {
    let commits = history.commits()?;

    let mut report = IssueReport::default();
    for fix in commits.iter().filter(|c| pattern.is_fix(&c.message)) {
        let Some(number) = pattern.issue_number(&fix.message) else {
            report.skipped.push(IssueSkip {
                fix_hash: fix.hash.clone(),
                issue_number: None,
            });
            continue;
        };

        let Some(issue) = issues.iter().find(|i| i.number == number) else {
            report.skipped.push(IssueSkip {
                fix_hash: fix.hash.clone(),
                issue_number: Some(number),
            });
            continue;
        };

        let outcome = analyze_fix(history, fix, options.recency)
            .and_then(|candidates| filter_by_issue_time(history, &candidates, &issue.created_at));

        match outcome {
            Ok(suspects) => report.suspects.push(FixAnalysis {
                fix_hash: fix.hash.clone(),
                summary: subject_line(&fix.message),
                issue_number: Some(number),
                candidates: suspects,
            }),
            Err(e) => report.failures.push(AnalysisFailure {
                fix_hash: fix.hash.clone(),
                error: e.to_string(),
            }),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_line_takes_the_first_line() {
        assert_eq!(subject_line("Fixed a bug\n\nlong body"), "Fixed a bug");
        assert_eq!(subject_line(""), "");
    }

    #[test]
    fn default_options_match_the_heuristic_cap() {
        let options = SzzOptions::default();
        assert_eq!(options.max_fixes, 5);
    }
}
