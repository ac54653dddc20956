//! Policy evaluation: join per-file stats with resolved domains.

use crate::errors::{Error, Result};
use crate::model::{
    Annotation, CoverageStat, DomainReport, DomainStatus, FileReport, Policy, Report,
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// When set (diff or incremental mode), only these repo-relative
    /// files take part in aggregation.
    pub changed: Option<BTreeSet<String>>,
    /// Overall floor, checked in addition to per-domain thresholds.
    pub fail_under: Option<f64>,
}

/// Evaluate a policy against merged per-file coverage.
///
/// `files` keys are repo-relative paths (project identity already
/// stripped); `domain_dirs` comes from the resolver, in the same form.
/// Pure: no I/O, deterministic output for identical inputs.
pub fn evaluate(
    policy: &Policy,
    files: &BTreeMap<String, CoverageStat>,
    domain_dirs: &BTreeMap<String, Vec<String>>,
    annotations: &BTreeMap<String, Annotation>,
    opts: &EvalOptions,
) -> Result<Report> {
    let excludes = build_excludes(&policy.exclude)?;
    let mut warnings: Vec<String> = Vec::new();

    let mut per_domain: BTreeMap<&str, CoverageStat> = BTreeMap::new();
    let mut file_reports: Vec<FileReport> = Vec::new();
    let mut overall = CoverageStat::default();

    for (path, stat) in files {
        if excludes.is_match(path.as_str()) {
            continue;
        }
        let annotation = annotations.get(path);
        if annotation.map(|a| a.ignore).unwrap_or(false) {
            continue;
        }
        if let Some(changed) = &opts.changed {
            if !changed.contains(path) {
                continue;
            }
        }

        let domain = assign_domain(policy, domain_dirs, path, annotation, &mut warnings);
        per_domain.entry(domain).or_default().add(*stat);
        overall.add(*stat);
        file_reports.push(FileReport {
            path: path.clone(),
            domain: domain.to_string(),
            covered: stat.covered,
            total: stat.total,
            percent: stat.percent(),
        });
    }

    let mut domain_reports = Vec::with_capacity(policy.domains.len());
    let mut any_fail = false;
    for domain in &policy.domains {
        let min = domain.effective_min(policy);
        match per_domain.get(domain.name.as_str()) {
            None => {
                warnings.push(format!("domain {} has no files", domain.name));
                domain_reports.push(DomainReport {
                    name: domain.name.clone(),
                    covered: 0,
                    total: 0,
                    percent: 0.0,
                    min,
                    status: DomainStatus::Unknown,
                });
            }
            Some(stat) => {
                let percent = stat.percent();
                let status = if percent >= min {
                    DomainStatus::Pass
                } else {
                    any_fail = true;
                    DomainStatus::Fail
                };
                domain_reports.push(DomainReport {
                    name: domain.name.clone(),
                    covered: stat.covered,
                    total: stat.total,
                    percent,
                    min,
                    status,
                });
            }
        }
    }

    let overall_percent = overall.percent();
    let under_floor = opts
        .fail_under
        .map(|floor| overall_percent < floor)
        .unwrap_or(false);

    Ok(Report {
        passed: !any_fail && !under_floor,
        overall,
        overall_percent,
        domains: domain_reports,
        files: file_reports,
        warnings,
    })
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::ConfigFormat(format!("bad exclude pattern {}: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigFormat(format!("bad exclude set: {}", e)))
}

/// Annotation wins when it names a real domain; otherwise the first
/// domain in declaration order whose directories prefix the file. The
/// empty name is the synthetic bucket for unmatched files.
fn assign_domain<'p>(
    policy: &'p Policy,
    domain_dirs: &BTreeMap<String, Vec<String>>,
    path: &str,
    annotation: Option<&Annotation>,
    warnings: &mut Vec<String>,
) -> &'p str {
    if let Some(requested) = annotation.and_then(|a| a.domain.as_deref()) {
        if let Some(domain) = policy.domain(requested) {
            return &domain.name;
        }
        warnings.push(format!(
            "file {} annotated with unknown domain {}",
            path, requested
        ));
    }

    for domain in &policy.domains {
        if let Some(dirs) = domain_dirs.get(&domain.name) {
            if dirs.iter().any(|dir| dir_contains(dir, path)) {
                return &domain.name;
            }
        }
    }
    ""
}

fn dir_contains(dir: &str, path: &str) -> bool {
    if dir == "." {
        return true;
    }
    path.strip_prefix(dir)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}
