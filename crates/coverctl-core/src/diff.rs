//! VCS diff integration for scoped reports and incremental runs.

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default base for `--diff` report scoping.
pub const DEFAULT_DIFF_REF: &str = "origin/main";
/// Default base for `--incremental` test selection.
pub const DEFAULT_INCREMENTAL_REF: &str = "HEAD~1";

pub trait DiffProvider: Send + Sync {
    /// Repo-relative paths changed versus `base_ref`, cleaned.
    fn changed_files(&self, base_ref: &str) -> Result<Vec<String>>;
}

/// Shells out to `git diff --name-only` at the project root.
pub struct GitDiff {
    root: PathBuf,
}

impl GitDiff {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DiffProvider for GitDiff {
    fn changed_files(&self, base_ref: &str) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["diff", "--name-only", base_ref])
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Resolve(format!("failed to run git diff: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Resolve(format!(
                "git diff --name-only {} failed: {}",
                base_ref,
                stderr.trim()
            )));
        }

        Ok(clean_paths(
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(|l| l.to_string()),
        ))
    }
}

/// Trim, drop empties, canonicalise separators, collapse `//` and `./`
/// segments.
pub fn clean_paths(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|line| {
            let trimmed = line.trim().replace('\\', "/");
            if trimmed.is_empty() {
                return None;
            }
            let cleaned: Vec<&str> = trimmed
                .split('/')
                .filter(|seg| !seg.is_empty() && *seg != ".")
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned.join("/"))
            }
        })
        .collect()
}

/// Directories owning the changed files, first occurrence order. This
/// is the package set an incremental test run selects.
pub fn owning_packages(changed: &[String]) -> Vec<String> {
    let mut packages = Vec::new();
    for file in changed {
        let dir = match file.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => ".".to_string(),
        };
        if !packages.contains(&dir) {
            packages.push(dir);
        }
    }
    packages
}

/// Best-effort commit and branch for history entries. Absent git (or a
/// non-repo) simply yields nothing.
pub fn git_context(root: &Path) -> (Option<String>, Option<String>) {
    let commit = git_line(root, &["rev-parse", "HEAD"]);
    let branch = git_line(root, &["rev-parse", "--abbrev-ref", "HEAD"]);
    (commit, branch)
}

fn git_line(root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
