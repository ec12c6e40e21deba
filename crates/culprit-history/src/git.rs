use std::path::{Path, PathBuf};
use std::process::Command;

use culprit_core::{CommitMeta, CulpritError, History};
use git2::{Repository, Sort};

/// Git-backed [`History`] provider.
///
/// Commit enumeration and hash resolution go through `git2`; diff and blame
/// *text* come from the external `git` client (`git diff -U0 --histogram
/// --no-renames`, `git blame --line-porcelain`), because the correlation
/// pipeline is defined over exactly those text formats. Each diff or blame
/// request is one blocking subprocess call.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use culprit_core::History;
/// use culprit_history::GitHistory;
///
/// let history = GitHistory::open(Path::new(".")).unwrap();
/// for commit in history.commits().unwrap().iter().take(3) {
///     println!("{} {}", &commit.hash[..7], commit.author);
/// }
/// ```
pub struct GitHistory {
    repo: Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for GitHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHistory")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl GitHistory {
    /// Open the repository at (or above) `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CulpritError::Git`] if no repository can be discovered.
    pub fn open(path: &Path) -> Result<Self, CulpritError> {
        let repo = Repository::discover(path)
            .map_err(|e| CulpritError::Git(format!("failed to open repository: {e}")))?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.to_path_buf());
        Ok(Self { repo, workdir })
    }

    fn run_git(&self, args: &[&str]) -> Result<String, CulpritError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CulpritError::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn meta(&self, commit: &git2::Commit) -> CommitMeta {
        let author = commit.author();
        CommitMeta {
            hash: commit.id().to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
            email: author.email().unwrap_or("unknown").to_string(),
            timestamp: commit.time().seconds(),
            message: commit.message().unwrap_or("").to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        }
    }
}

impl History for GitHistory {
    fn commits(&self) -> Result<Vec<CommitMeta>, CulpritError> {
        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| CulpritError::Git(format!("failed to create revwalk: {e}")))?;

        revwalk.set_sorting(Sort::TIME).ok();
        revwalk
            .push_head()
            .map_err(|e| CulpritError::Git(format!("failed to push HEAD: {e}")))?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(|e| CulpritError::Git(format!("revwalk error: {e}")))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| CulpritError::Git(format!("failed to find commit: {e}")))?;
            commits.push(self.meta(&commit));
        }

        Ok(commits)
    }

    fn diff(&self, commit: &str, parent: &str) -> Result<String, CulpritError> {
        self.run_git(&["diff", "-U0", "--histogram", "--no-renames", commit, parent])
    }

    fn blame(&self, revision: &str, path: &str) -> Result<String, CulpritError> {
        self.run_git(&["blame", revision, "--line-porcelain", "--", path])
    }

    fn resolve(&self, hash: &str) -> Result<CommitMeta, CulpritError> {
        let object = self
            .repo
            .revparse_single(hash)
            .map_err(|e| CulpritError::Git(format!("failed to resolve '{hash}': {e}")))?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| CulpritError::Git(format!("'{hash}' is not a commit: {e}")))?;
        Ok(self.meta(&commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_file(
        repo: &Repository,
        name: &str,
        content: &str,
        message: &str,
        timestamp: i64,
    ) -> git2::Oid {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let time = git2::Time::new(timestamp, 0);
        let sig = git2::Signature::new("Test Author", "test@example.com", &time).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn open_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitHistory::open(dir.path()).unwrap_err();
        assert!(matches!(err, CulpritError::Git(_)));
    }

    #[test]
    fn commits_are_newest_first_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "a.txt", "one\n", "initial import", 1700000000);
        commit_file(&repo, "a.txt", "two\n", "Fixed a bug in a.txt", 1700000500);

        let history = GitHistory::open(dir.path()).unwrap();
        let commits = history.commits().unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "Fixed a bug in a.txt");
        assert_eq!(commits[0].timestamp, 1700000500);
        assert_eq!(commits[0].parents.len(), 1);
        assert_eq!(commits[0].parents[0], commits[1].hash);
        assert!(commits[1].parents.is_empty());
        assert_eq!(commits[0].hash.len(), 40);
        assert_eq!(commits[0].author, "Test Author");
    }

    #[test]
    fn resolve_round_trips_a_commit() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let oid = commit_file(&repo, "a.txt", "one\n", "initial import", 1700000000);

        let history = GitHistory::open(dir.path()).unwrap();
        let resolved = history.resolve(&oid.to_string()).unwrap();
        assert_eq!(resolved.hash, oid.to_string());
        assert_eq!(resolved.timestamp, 1700000000);
    }

    #[test]
    fn resolve_rejects_unknown_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "a.txt", "one\n", "initial import", 1700000000);

        let history = GitHistory::open(dir.path()).unwrap();
        let err = history
            .resolve("ffffffffffffffffffffffffffffffffffffffff")
            .unwrap_err();
        assert!(matches!(err, CulpritError::Git(_)));
    }
}
