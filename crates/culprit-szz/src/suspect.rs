use std::collections::BTreeSet;

use chrono::DateTime;
use culprit_core::{Candidate, CulpritError, History};

/// Convert an ISO-8601 issue-creation timestamp to epoch seconds.
///
/// A trailing `Z` is normalized to an explicit `+00:00` offset before
/// parsing.
///
/// # Errors
///
/// Returns [`CulpritError::Parse`] if the string is not a valid RFC-3339
/// timestamp.
///
/// # Examples
///
/// ```
/// use culprit_szz::issue_epoch;
///
/// assert_eq!(issue_epoch("2021-11-01T00:00:00Z").unwrap(), 1635724800);
/// assert_eq!(issue_epoch("2021-11-01T01:00:00+01:00").unwrap(), 1635724800);
/// assert!(issue_epoch("yesterday-ish").is_err());
/// ```
pub fn issue_epoch(created_at: &str) -> Result<i64, CulpritError> {
    let normalized = created_at.replace('Z', "+00:00");
    let parsed = DateTime::parse_from_rfc3339(&normalized).map_err(|e| {
        CulpritError::Parse(format!("invalid issue timestamp {created_at:?}: {e}"))
    })?;
    Ok(parsed.timestamp())
}

/// Retain only candidates committed strictly before the issue was opened.
///
/// A commit made at or after the issue's creation time cannot be the bug's
/// original cause — at best it is a partial or follow-up fix — so ties are
/// excluded. Candidates come out in the set's deterministic order.
///
/// # Errors
///
/// Returns [`CulpritError::Parse`] for an unparseable timestamp and
/// propagates hash-resolution failures from `history`; either aborts this
/// one fix's analysis.
pub fn filter_by_issue_time(
    history: &dyn History,
    candidates: &BTreeSet<Candidate>,
    created_at: &str,
) -> Result<Vec<Candidate>, CulpritError> {
    let cutoff = issue_epoch(created_at)?;

    let mut suspects = Vec::new();
    for candidate in candidates {
        let commit = history.resolve(&candidate.hash)?;
        if commit.timestamp < cutoff {
            suspects.push(candidate.clone());
        }
    }

    Ok(suspects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use culprit_core::CommitMeta;

    struct TimestampHistory(Vec<(String, i64)>);

    impl History for TimestampHistory {
        fn commits(&self) -> Result<Vec<CommitMeta>, CulpritError> {
            Ok(vec![])
        }

        fn diff(&self, _commit: &str, _parent: &str) -> Result<String, CulpritError> {
            Ok(String::new())
        }

        fn blame(&self, _revision: &str, _path: &str) -> Result<String, CulpritError> {
            Ok(String::new())
        }

        fn resolve(&self, hash: &str) -> Result<CommitMeta, CulpritError> {
            let (hash, timestamp) = self
                .0
                .iter()
                .find(|(h, _)| h == hash)
                .ok_or_else(|| CulpritError::Git(format!("unknown commit {hash}")))?;
            Ok(CommitMeta {
                hash: hash.clone(),
                author: "someone".into(),
                email: "someone@example.com".into(),
                timestamp: *timestamp,
                message: String::new(),
                parents: vec![],
            })
        }
    }

    fn candidate(hash: &str) -> Candidate {
        Candidate {
            hash: hash.into(),
            author: "someone".into(),
        }
    }

    #[test]
    fn strictly_earlier_commits_are_retained() {
        // Issue opened at epoch 1635724800.
        let history = TimestampHistory(vec![
            ("aaa111".into(), 1635724799),
            ("bbb222".into(), 1635724800),
            ("ccc333".into(), 1635724801),
        ]);
        let candidates: BTreeSet<Candidate> =
            [candidate("aaa111"), candidate("bbb222"), candidate("ccc333")]
                .into_iter()
                .collect();

        let suspects =
            filter_by_issue_time(&history, &candidates, "2021-11-01T00:00:00Z").unwrap();

        assert_eq!(suspects, vec![candidate("aaa111")]);
    }

    #[test]
    fn empty_candidate_set_stays_empty() {
        let history = TimestampHistory(vec![]);
        let suspects =
            filter_by_issue_time(&history, &BTreeSet::new(), "2021-11-01T00:00:00Z").unwrap();
        assert!(suspects.is_empty());
    }

    #[test]
    fn malformed_timestamp_is_a_parse_error() {
        let history = TimestampHistory(vec![]);
        let candidates: BTreeSet<Candidate> = [candidate("aaa111")].into_iter().collect();
        let err = filter_by_issue_time(&history, &candidates, "2021-13-45").unwrap_err();
        assert!(matches!(err, CulpritError::Parse(_)));
    }

    #[test]
    fn unresolvable_candidate_propagates_error() {
        let history = TimestampHistory(vec![]);
        let candidates: BTreeSet<Candidate> = [candidate("aaa111")].into_iter().collect();
        let err =
            filter_by_issue_time(&history, &candidates, "2021-11-01T00:00:00Z").unwrap_err();
        assert!(matches!(err, CulpritError::Git(_)));
    }

    #[test]
    fn explicit_offset_timestamps_parse() {
        assert_eq!(issue_epoch("2021-11-01T02:00:00+02:00").unwrap(), 1635724800);
    }
}
