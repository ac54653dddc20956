//! Language-agnostic glob resolution.

use super::Resolver;
use crate::errors::{Error, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Fallback strategy: patterns match directories found by walking the
/// project tree. `./` prefixes are trimmed and a trailing `/...` means
/// the directory and everything beneath it, matching the import-style
/// spelling.
pub struct GlobResolver;

impl Resolver for GlobResolver {
    fn name(&self) -> &'static str {
        "glob"
    }

    fn detect(&self, _root: &Path) -> bool {
        true
    }

    fn identity(&self, _root: &Path) -> Result<String> {
        // Glob projects produce profiles with repo-relative paths
        // already; nothing to strip.
        Ok(String::new())
    }

    fn resolve(
        &self,
        root: &Path,
        patterns: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let walked = walk_dirs(root);
        let mut dirs: Vec<String> = Vec::new();

        for pattern in patterns {
            if Path::new(pattern).is_absolute() {
                if !dirs.contains(pattern) {
                    dirs.push(pattern.clone());
                }
                continue;
            }

            let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
            let mut matched = false;

            if trimmed == "..." {
                // `./...` is the whole project, root directory included.
                matched = true;
                if !dirs.iter().any(|d| d == ".") {
                    dirs.push(".".to_string());
                }
                for dir in &walked {
                    if !dirs.contains(dir) {
                        dirs.push(dir.clone());
                    }
                }
            } else if let Some(base) = trimmed.strip_suffix("/...") {
                // `core/...` covers core itself plus every subdirectory.
                let under = format!("{}/", base);
                for dir in &walked {
                    if dir == base || dir.starts_with(&under) {
                        matched = true;
                        if !dirs.contains(dir) {
                            dirs.push(dir.clone());
                        }
                    }
                }
            } else {
                let glob = globset::Glob::new(trimmed)
                    .map_err(|e| Error::Resolve(format!("bad pattern {}: {}", pattern, e)))?
                    .compile_matcher();
                for dir in &walked {
                    if glob.is_match(dir) {
                        matched = true;
                        if !dirs.contains(dir) {
                            dirs.push(dir.clone());
                        }
                    }
                }
            }

            if !matched {
                warnings.push(format!("pattern {} matched no directories", pattern));
            }
        }
        Ok(dirs)
    }
}

/// Repo-relative directories under the root, sorted, dotted entries
/// skipped.
fn walk_dirs(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Never filter the root itself; its basename is not part of
            // any relative path.
            e.depth() == 0
                || !e
                    .file_name()
                    .to_str()
                    .map(|n| n.starts_with('.'))
                    .unwrap_or(false)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?;
            let s = rel.to_string_lossy().replace('\\', "/");
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
        .collect()
}
