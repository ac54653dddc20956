//! Domain pattern resolution.
//!
//! A resolver turns a domain's match patterns into repo-relative source
//! directories. Strategies form a tagged registry tried in declaration
//! order; the first whose `detect` accepts the project root wins, with
//! the language-agnostic glob strategy as the catch-all.

mod globs;
mod golang;

pub use globs::GlobResolver;
pub use golang::GoResolver;

use crate::errors::Result;
use crate::model::Policy;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this strategy applies at the given project root.
    fn detect(&self, root: &Path) -> bool;

    /// The string used to strip the project prefix from profile file
    /// paths (the module path for Go; empty when profile paths are
    /// already repo-relative).
    fn identity(&self, root: &Path) -> Result<String>;

    /// Expand patterns into an ordered, deduplicated list of
    /// repo-relative directories. A pattern matching nothing pushes a
    /// warning instead of failing.
    fn resolve(&self, root: &Path, patterns: &[String], warnings: &mut Vec<String>)
        -> Result<Vec<String>>;
}

pub fn registry() -> Vec<Box<dyn Resolver>> {
    vec![Box::new(GoResolver), Box::new(GlobResolver)]
}

/// Pick the first strategy whose `detect` matches. GlobResolver always
/// detects, so this cannot come back empty-handed.
pub fn select(root: &Path) -> Box<dyn Resolver> {
    registry()
        .into_iter()
        .find(|r| r.detect(root))
        .expect("glob resolver is a catch-all")
}

/// Project root plus the prefix profile paths carry in front of
/// repo-relative ones.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub identity: String,
}

impl ProjectContext {
    pub fn new(root: PathBuf, identity: String) -> Self {
        Self { root, identity }
    }

    /// Strip the project identity from a profile file path, yielding the
    /// repo-relative form the resolver output compares against.
    pub fn relativize<'a>(&self, path: &'a str) -> &'a str {
        if self.identity.is_empty() {
            return path;
        }
        path.strip_prefix(&self.identity)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }
}

/// Resolve every domain of the policy, in policy order.
pub fn resolve_domains(
    resolver: &dyn Resolver,
    root: &Path,
    policy: &Policy,
    warnings: &mut Vec<String>,
) -> Result<BTreeMap<String, Vec<String>>> {
    let mut out = BTreeMap::new();
    for domain in &policy.domains {
        let dirs = resolver.resolve(root, &domain.matches, warnings)?;
        if dirs.is_empty() {
            warnings.push(format!("domain {} matched no directories", domain.name));
        }
        out.insert(domain.name.clone(), dirs);
    }
    Ok(out)
}
