//! Import-style resolution for Go projects.

use super::Resolver;
use crate::errors::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Resolves `./pkg/...`-style patterns through `go list`, so domain
/// membership follows the build tool's package view rather than a raw
/// directory walk.
pub struct GoResolver;

impl Resolver for GoResolver {
    fn name(&self) -> &'static str {
        "go"
    }

    fn detect(&self, root: &Path) -> bool {
        root.join("go.mod").is_file()
    }

    fn identity(&self, root: &Path) -> Result<String> {
        let gomod = root.join("go.mod");
        let text = std::fs::read_to_string(&gomod)
            .map_err(|e| Error::io(format!("failed to read {}", gomod.display()), e))?;
        module_path(&text)
            .ok_or_else(|| Error::Resolve(format!("no module line in {}", gomod.display())))
    }

    fn resolve(
        &self,
        root: &Path,
        patterns: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let mut dirs = Vec::new();
        for pattern in patterns {
            let output = Command::new("go")
                .args(["list", "-f", "{{.Dir}}", pattern])
                .current_dir(root)
                .output()
                .map_err(|e| Error::Resolve(format!("failed to run go list: {}", e)))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(Error::Resolve(format!(
                    "go list {} failed: {}",
                    pattern,
                    stderr.trim()
                )));
            }

            let mut matched = false;
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                let abs = line.trim();
                if abs.is_empty() {
                    continue;
                }
                matched = true;
                let rel = relative_dir(root, abs);
                if !dirs.contains(&rel) {
                    dirs.push(rel);
                }
            }
            if !matched {
                warnings.push(format!("pattern {} matched no packages", pattern));
            }
        }
        Ok(dirs)
    }
}

fn module_path(gomod: &str) -> Option<String> {
    gomod.lines().find_map(|line| {
        line.trim()
            .strip_prefix("module ")
            .map(|m| m.trim().to_string())
    })
}

/// `go list` prints absolute package directories; profile paths compare
/// repo-relative with forward slashes.
fn relative_dir(root: &Path, abs: &str) -> String {
    let abs_path = Path::new(abs);
    let canon = root.canonicalize().ok();
    let rel = abs_path
        .strip_prefix(root)
        .ok()
        .or_else(|| canon.as_deref().and_then(|c| abs_path.strip_prefix(c).ok()))
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|| abs.replace('\\', "/"));
    if rel.is_empty() {
        ".".to_string()
    } else {
        rel
    }
}
