use std::path::PathBuf;

/// Errors that can occur across the culprit pipeline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use culprit_core::CulpritError;
///
/// let err = CulpritError::Config("missing issue pattern".into());
/// assert!(err.to_string().contains("missing issue pattern"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CulpritError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure, including failed external `git` calls.
    #[error("git error: {0}")]
    Git(String),

    /// Diff, blame, or timestamp parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid fix-reference regular expression.
    #[error("invalid fix-reference pattern: {0}")]
    Pattern(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CulpritError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = CulpritError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn pattern_error_displays_message() {
        let err = CulpritError::Pattern("unclosed group".into());
        assert!(err.to_string().contains("unclosed group"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = CulpritError::FileNotFound(PathBuf::from("/tmp/issues.json"));
        assert!(err.to_string().contains("/tmp/issues.json"));
    }
}
