use std::collections::{BTreeSet, HashMap};

use culprit_core::{Candidate, ChangeMap, CulpritError, History};

use crate::parser::parse_blame;

/// How a file's matching blame attributions collapse into candidates.
///
/// # Examples
///
/// ```
/// use culprit_blamelens::RecencyPolicy;
///
/// assert_eq!(RecencyPolicy::default(), RecencyPolicy::All);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecencyPolicy {
    /// Every matching attribution becomes a candidate.
    #[default]
    All,
    /// Only the most recently committed matching attribution survives,
    /// per file.
    MostRecentOnly,
}

/// Correlate one file's blame text against the changed pre-image lines.
///
/// Each attribution record whose line-number-in-the-blamed-revision appears
/// in `changes` for `file_path` yields a `(hash, author)` candidate. Under
/// [`RecencyPolicy::MostRecentOnly`] a single most-recent pair is tracked
/// instead: it is replaced only when a newly seen matching commit's
/// committer timestamp (resolved through `history`) is strictly greater, so
/// on exact ties the earlier-encountered candidate wins.
///
/// # Errors
///
/// Returns an error only when the recency policy needs a commit timestamp
/// and `history` cannot resolve the hash.
pub fn candidate_commits(
    blame_text: &str,
    file_path: &str,
    changes: &ChangeMap,
    policy: RecencyPolicy,
    history: &dyn History,
) -> Result<BTreeSet<Candidate>, CulpritError> {
    let mut candidates = BTreeSet::new();
    let mut most_recent: Option<(Candidate, i64)> = None;
    // line-porcelain repeats the same hash for every line of a group
    let mut timestamps: HashMap<String, i64> = HashMap::new();

    for record in parse_blame(blame_text) {
        if !changes.contains(file_path, record.final_line) {
            continue;
        }

        let candidate = Candidate {
            hash: record.hash.clone(),
            author: record.author.clone(),
        };

        match policy {
            RecencyPolicy::All => {
                candidates.insert(candidate);
            }
            RecencyPolicy::MostRecentOnly => {
                let timestamp = match timestamps.get(&record.hash) {
                    Some(ts) => *ts,
                    None => {
                        let ts = history.resolve(&record.hash)?.timestamp;
                        timestamps.insert(record.hash.clone(), ts);
                        ts
                    }
                };
                match &most_recent {
                    Some((_, best)) if timestamp <= *best => {}
                    _ => most_recent = Some((candidate, timestamp)),
                }
            }
        }
    }

    if let Some((candidate, _)) = most_recent {
        candidates.insert(candidate);
    }

    Ok(candidates)
}

/// Union the per-file candidate sets for every file in a fix's [`ChangeMap`].
///
/// Blame is fetched at `parent` — the fix's first parent, per the
/// correlation invariant on [`History`]. A commit attributed through several
/// files collapses to one set entry per distinct `(hash, author)` pair.
///
/// # Errors
///
/// Propagates blame-provider failures and, under the recency policy,
/// hash-resolution failures.
pub fn aggregate_candidates(
    history: &dyn History,
    parent: &str,
    changes: &ChangeMap,
    policy: RecencyPolicy,
) -> Result<BTreeSet<Candidate>, CulpritError> {
    let mut all = BTreeSet::new();

    for (file_path, _) in changes.iter() {
        let blame_text = history.blame(parent, file_path)?;
        let candidates = candidate_commits(&blame_text, file_path, changes, policy, history)?;
        all.extend(candidates);
    }

    Ok(all)
}
