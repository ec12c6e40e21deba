use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CulpritError;

/// Metadata for one commit, as produced by a [`crate::History`] provider.
///
/// The hash is the full hex object id; `parents` holds the hashes of the
/// parent commits in order (empty for a root commit). The message is the
/// complete commit message, not just the subject line, because the bug-fix
/// classifiers match anywhere in it.
///
/// # Examples
///
/// ```
/// use culprit_core::CommitMeta;
///
/// let meta = CommitMeta {
///     hash: "f4529e84".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1700000000,
///     message: "Fixed a bug in the parser".into(),
///     parents: vec!["85ac1c43".into()],
/// };
/// assert_eq!(meta.parents.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMeta {
    /// Full hex commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Committer timestamp, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Full commit message.
    pub message: String,
    /// Parent commit hashes, in order. Empty for a root commit.
    pub parents: Vec<String>,
}

/// Pre-image line numbers a fix rewrote, grouped per file.
///
/// Keys keep first-seen order from the diff; the line lists keep hunk
/// emission order and are neither sorted nor deduplicated. A path is only
/// present if at least one non-comment changed line was recorded for it —
/// [`ChangeMap::insert`] drops empty lists to uphold that invariant.
///
/// # Examples
///
/// ```
/// use culprit_core::ChangeMap;
///
/// let mut map = ChangeMap::new();
/// map.insert("src/lib.rs".into(), vec![3469]);
/// map.insert("src/empty.rs".into(), vec![]);
///
/// assert_eq!(map.len(), 1);
/// assert!(map.contains("src/lib.rs", 3469));
/// assert!(!map.contains("src/lib.rs", 3470));
/// assert!(map.lines_for("src/empty.rs").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeMap {
    entries: Vec<(String, Vec<u32>)>,
}

impl ChangeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the changed pre-image lines for `path`.
    ///
    /// An empty line list is ignored. A path inserted twice keeps both
    /// entries' lines appended in order.
    pub fn insert(&mut self, path: String, lines: Vec<u32>) {
        if lines.is_empty() {
            return;
        }
        if let Some((_, existing)) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            existing.extend(lines);
        } else {
            self.entries.push((path, lines));
        }
    }

    /// The recorded line numbers for `path`, if any.
    pub fn lines_for(&self, path: &str) -> Option<&[u32]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, lines)| lines.as_slice())
    }

    /// Whether `line` was recorded as changed in `path`.
    pub fn contains(&self, path: &str, line: u32) -> bool {
        self.lines_for(path)
            .is_some_and(|lines| lines.contains(&line))
    }

    /// Iterate over `(path, lines)` entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.entries
            .iter()
            .map(|(p, lines)| (p.as_str(), lines.as_slice()))
    }

    /// Number of files with recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file has recorded changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A commit suspected of having introduced a bug: the blame attribution of
/// one or more rewritten lines.
///
/// Equality and set membership are by value of both fields. The derived
/// ordering (hash, then author) gives candidate sets a deterministic
/// iteration order.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use culprit_core::Candidate;
///
/// let mut set = BTreeSet::new();
/// set.insert(Candidate { hash: "f4529e84".into(), author: "Adrian Kuegel".into() });
/// set.insert(Candidate { hash: "f4529e84".into(), author: "Adrian Kuegel".into() });
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Hash of the suspected commit.
    pub hash: String,
    /// Author name as attributed by blame.
    pub author: String,
}

/// One issue from an externally supplied bug-report dataset.
///
/// `number` accepts either a JSON number or a numeric string; `created_at`
/// is an ISO-8601 timestamp, optionally `Z`-suffixed.
///
/// # Examples
///
/// ```
/// use culprit_core::IssueRecord;
///
/// let issues: Vec<IssueRecord> = serde_json::from_str(
///     r#"[{"number": 42, "created_at": "2021-11-01T00:00:00Z"},
///         {"number": "43", "created_at": "2021-12-01T08:30:00Z"}]"#,
/// ).unwrap();
/// assert_eq!(issues[0].number, 42);
/// assert_eq!(issues[1].number, 43);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue number.
    #[serde(deserialize_with = "number_or_string")]
    pub number: i64,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

impl IssueRecord {
    /// Load an issue dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CulpritError::FileNotFound`] if `path` does not exist,
    /// [`CulpritError::Io`] if it cannot be read, or
    /// [`CulpritError::Serialization`] if the content is not a valid issue
    /// array. A malformed dataset aborts issue-aware mode for the whole run.
    pub fn load(path: &Path) -> Result<Vec<IssueRecord>, CulpritError> {
        if !path.exists() {
            return Err(CulpritError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let issues = serde_json::from_str(&content)?;
        Ok(issues)
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid issue number: {s:?}"))),
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use culprit_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
