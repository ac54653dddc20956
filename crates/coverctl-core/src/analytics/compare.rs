//! Base-versus-head comparison of two evaluations under one policy.

use crate::model::Report;
use serde::Serialize;
use std::collections::BTreeMap;

/// File movement below this magnitude counts as unchanged.
pub const FILE_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct FileDelta {
    pub path: String,
    pub base: f64,
    pub head: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub overall_delta: f64,
    pub base_percent: f64,
    pub head_percent: f64,
    pub domains: BTreeMap<String, f64>,
    pub improved: Vec<FileDelta>,
    pub regressed: Vec<FileDelta>,
    pub unchanged: Vec<String>,
}

pub fn compute(base: &Report, head: &Report) -> CompareReport {
    let base_domains: BTreeMap<&str, f64> = base
        .domains
        .iter()
        .map(|d| (d.name.as_str(), d.percent))
        .collect();
    let domains = head
        .domains
        .iter()
        .map(|d| {
            let before = base_domains.get(d.name.as_str()).copied().unwrap_or(0.0);
            (d.name.clone(), d.percent - before)
        })
        .collect();

    // A file present on only one side is 0% on the missing side: a new
    // covered file lands in improved, a vanished one in regressed.
    let base_files: BTreeMap<&str, f64> =
        base.files.iter().map(|f| (f.path.as_str(), f.percent)).collect();
    let head_files: BTreeMap<&str, f64> =
        head.files.iter().map(|f| (f.path.as_str(), f.percent)).collect();

    let mut paths: Vec<&str> = base_files.keys().chain(head_files.keys()).copied().collect();
    paths.sort_unstable();
    paths.dedup();

    let mut improved = Vec::new();
    let mut regressed = Vec::new();
    let mut unchanged = Vec::new();
    for path in paths {
        let b = base_files.get(path).copied().unwrap_or(0.0);
        let h = head_files.get(path).copied().unwrap_or(0.0);
        let delta = h - b;
        if delta > FILE_EPSILON {
            improved.push(FileDelta {
                path: path.to_string(),
                base: b,
                head: h,
                delta,
            });
        } else if delta < -FILE_EPSILON {
            regressed.push(FileDelta {
                path: path.to_string(),
                base: b,
                head: h,
                delta,
            });
        } else {
            unchanged.push(path.to_string());
        }
    }

    CompareReport {
        overall_delta: head.overall_percent - base.overall_percent,
        base_percent: base.overall_percent,
        head_percent: head.overall_percent,
        domains,
        improved,
        regressed,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageStat, FileReport};

    fn report(overall: f64, files: &[(&str, f64)]) -> Report {
        Report {
            passed: true,
            overall: CoverageStat::new(0, 0),
            overall_percent: overall,
            domains: vec![],
            files: files
                .iter()
                .map(|(path, pct)| FileReport {
                    path: path.to_string(),
                    domain: "core".into(),
                    covered: 0,
                    total: 0,
                    percent: *pct,
                })
                .collect(),
            warnings: vec![],
        }
    }

    #[test]
    fn files_split_by_movement_threshold() {
        let base = report(70.0, &[("a.go", 50.0), ("b.go", 80.0), ("c.go", 60.0)]);
        let head = report(75.0, &[("a.go", 65.0), ("b.go", 79.95), ("c.go", 40.0)]);
        let cmp = compute(&base, &head);

        assert!((cmp.overall_delta - 5.0).abs() < 1e-9);
        assert_eq!(cmp.improved.len(), 1);
        assert_eq!(cmp.improved[0].path, "a.go");
        assert_eq!(cmp.regressed.len(), 1);
        assert_eq!(cmp.regressed[0].path, "c.go");
        assert_eq!(cmp.unchanged, vec!["b.go".to_string()]);
    }

    #[test]
    fn one_sided_files_compare_against_zero() {
        let base = report(50.0, &[("gone.go", 90.0)]);
        let head = report(50.0, &[("new.go", 75.0)]);
        let cmp = compute(&base, &head);

        assert_eq!(cmp.improved[0].path, "new.go");
        assert!((cmp.improved[0].delta - 75.0).abs() < 1e-9);
        assert_eq!(cmp.regressed[0].path, "gone.go");
        assert!((cmp.regressed[0].delta + 90.0).abs() < 1e-9);
    }
}
