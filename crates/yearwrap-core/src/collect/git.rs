//! Commit history collection via the `git` binary.

use super::HistoryCollector;
use crate::{parser, CommitRecord, WrapError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Collects history by shelling out to `git log` in a target directory.
pub struct GitCli {
    dir: PathBuf,
}

impl GitCli {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory basename, used as the default report title source.
    pub fn repo_name(&self) -> Option<String> {
        self.dir
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(&self.dir)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn inside_work_tree(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&self.dir)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

impl HistoryCollector for GitCli {
    fn history_for_year(&self, year: i32) -> Result<Option<Vec<CommitRecord>>, WrapError> {
        if !self.inside_work_tree() {
            return Ok(None);
        }

        // %x1e/%x1f keep multi-line commit messages unambiguous; --numstat
        // rows follow each record.
        let output = Command::new("git")
            .args([
                "log",
                &format!("--since={}-01-01T00:00:00", year),
                &format!("--until={}-12-31T23:59:59", year),
                "--date=iso-strict",
                "--pretty=format:%x1e%aI%x1f%B%x1f",
                "--numstat",
            ])
            .current_dir(&self.dir)
            .output()
            .map_err(|e| WrapError::Collector(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            // A repo with no commits in range (or an empty repo) is data
            // absence, not a failure.
            tracing::warn!(
                status = %output.status,
                "git log returned non-zero, treating history as empty"
            );
            return Ok(Some(Vec::new()));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(Some(parser::parse_commit_log(&raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_repo_dir_yields_none() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = GitCli::new(tmp.path());
        let result = collector.history_for_year(2025).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_repo_name_is_directory_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("my-project");
        std::fs::create_dir(&project).unwrap();
        let collector = GitCli::new(&project);
        assert_eq!(collector.repo_name().as_deref(), Some("my-project"));
    }
}
