use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CulpritError;

/// Top-level configuration loaded from `.culprit.toml`.
///
/// Resolution is layered: CLI flags > local config file > defaults.
///
/// # Examples
///
/// ```
/// use culprit_core::CulpritConfig;
///
/// let config = CulpritConfig::default();
/// assert_eq!(config.hunt.max_fixes, 5);
/// assert!(!config.hunt.recent_only);
/// assert!(config.issues.pattern.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CulpritConfig {
    /// Heuristic-mode settings.
    #[serde(default)]
    pub hunt: HuntConfig,
    /// Issue-aware-mode settings.
    #[serde(default)]
    pub issues: IssueConfig,
}

impl CulpritConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CulpritError::Io`] if the file cannot be read, or
    /// [`CulpritError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use culprit_core::CulpritConfig;
    /// use std::path::Path;
    ///
    /// let config = CulpritConfig::from_file(Path::new(".culprit.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CulpritError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CulpritError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use culprit_core::CulpritConfig;
    ///
    /// let toml = r#"
    /// [hunt]
    /// max_fixes = 10
    ///
    /// [issues]
    /// pattern = '#(\d+)'
    /// "#;
    /// let config = CulpritConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.hunt.max_fixes, 10);
    /// assert_eq!(config.issues.pattern.as_deref(), Some(r"#(\d+)"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CulpritError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Heuristic-mode (keyword policy) settings.
///
/// # Examples
///
/// ```
/// use culprit_core::HuntConfig;
///
/// let config = HuntConfig::default();
/// assert_eq!(config.max_fixes, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntConfig {
    /// How many bug-fix commits to analyze, newest first.
    #[serde(default = "default_max_fixes")]
    pub max_fixes: usize,
    /// Collapse each file's attributions to the most recent commit only.
    #[serde(default)]
    pub recent_only: bool,
}

fn default_max_fixes() -> usize {
    5
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            max_fixes: default_max_fixes(),
            recent_only: false,
        }
    }
}

/// Issue-aware-mode (pattern policy) settings.
///
/// The pattern is a case-insensitive regex whose first capture group is the
/// issue number, e.g. `#(\d+)`. There is no default: issue-aware mode cannot
/// run without one, and refuses to guess.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueConfig {
    /// Fix-reference regex with the issue number as capture group 1.
    pub pattern: Option<String>,
}
