use culprit_core::CulpritError;
use regex::{Regex, RegexBuilder};

/// Keyword policy: does a commit message denote a bug fix?
///
/// The lower-cased message must contain the substring `"bug"` and either
/// `"fix"` or `"fixed"`. This is pure substring containment, not
/// word-boundary matching — "debugging" satisfies "bug" and "suffix"
/// satisfies "fix". The looseness is intentional and preserved from the
/// original SZZ heuristic.
///
/// # Examples
///
/// ```
/// use culprit_szz::is_keyword_bug_fix;
///
/// assert!(is_keyword_bug_fix("Fixed a bug"));
/// assert!(is_keyword_bug_fix("suffix handling while debugging"));
/// assert!(!is_keyword_bug_fix("Fix #123456"));
/// ```
pub fn is_keyword_bug_fix(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("bug") && (message.contains("fix") || message.contains("fixed"))
}

/// Pattern policy: a caller-supplied, case-insensitive fix-reference regex.
///
/// The first capture group is expected to hold the issue number, e.g.
/// `#(\d+)`.
///
/// # Examples
///
/// ```
/// use culprit_szz::FixPattern;
///
/// let pattern = FixPattern::new(r"#(\d+)").unwrap();
/// assert!(pattern.is_fix("Fix crash, closes #4217"));
/// assert_eq!(pattern.issue_number("Fix crash, closes #4217"), Some(4217));
/// assert_eq!(pattern.issue_number("no reference here"), None);
/// ```
#[derive(Debug, Clone)]
pub struct FixPattern {
    regex: Regex,
}

impl FixPattern {
    /// Compile a fix-reference pattern.
    ///
    /// # Errors
    ///
    /// Returns [`CulpritError::Pattern`] if the pattern is empty or not a
    /// valid regex. Issue-aware classification cannot proceed without one.
    pub fn new(pattern: &str) -> Result<Self, CulpritError> {
        if pattern.trim().is_empty() {
            return Err(CulpritError::Pattern("pattern is empty".into()));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CulpritError::Pattern(e.to_string()))?;
        Ok(Self { regex })
    }

    /// Whether the message contains a fix reference anywhere.
    pub fn is_fix(&self, message: &str) -> bool {
        self.regex.is_match(message)
    }

    /// The issue number from the first capture group, if the message
    /// matches and the group parses as an integer.
    pub fn issue_number(&self, message: &str) -> Option<i64> {
        self.regex
            .captures(message)?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_policy_needs_bug_and_fix() {
        assert!(is_keyword_bug_fix("Fixed a bug"));
        assert!(is_keyword_bug_fix("bug fix: another problem in the code"));
        assert!(is_keyword_bug_fix("Fixing a bug"));

        assert!(!is_keyword_bug_fix("Fix #123456"));
        assert!(!is_keyword_bug_fix("Bug #123456"));
        assert!(!is_keyword_bug_fix("Adding a new feature"));
        assert!(!is_keyword_bug_fix(""));
    }

    #[test]
    fn keyword_policy_is_substring_based() {
        // Intentionally loose: no word boundaries.
        assert!(is_keyword_bug_fix("debugging the suffix logic"));
    }

    #[test]
    fn keyword_policy_is_case_insensitive() {
        assert!(is_keyword_bug_fix("BUG FIX: broken parser"));
    }

    #[test]
    fn pattern_matches_case_insensitively() {
        let pattern = FixPattern::new(r"fixes #(\d+)").unwrap();
        assert!(pattern.is_fix("FIXES #12"));
        assert_eq!(pattern.issue_number("Fixes #12 for real"), Some(12));
    }

    #[test]
    fn pattern_without_reference_does_not_match() {
        let pattern = FixPattern::new(r"#(\d+)").unwrap();
        assert!(!pattern.is_fix("refactor: tidy module layout"));
        assert_eq!(pattern.issue_number("refactor"), None);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let err = FixPattern::new("   ").unwrap_err();
        assert!(matches!(err, CulpritError::Pattern(_)));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = FixPattern::new("#(\\d+").unwrap_err();
        assert!(matches!(err, CulpritError::Pattern(_)));
    }

    #[test]
    fn pattern_without_capture_group_yields_no_number() {
        let pattern = FixPattern::new(r"#\d+").unwrap();
        assert!(pattern.is_fix("Fix #99"));
        assert_eq!(pattern.issue_number("Fix #99"), None);
    }
}
