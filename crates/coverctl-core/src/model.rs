use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statement counts for one file or one aggregated domain.
///
/// Invariant: `covered <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub covered: u64,
    pub total: u64,
}

impl CoverageStat {
    pub fn new(covered: u64, total: u64) -> Self {
        debug_assert!(covered <= total);
        Self { covered, total }
    }

    /// Line coverage as a percentage. A stat with no statements is
    /// vacuously complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.covered as f64 * 100.0 / self.total as f64
        }
    }

    pub fn add(&mut self, other: CoverageStat) {
        self.covered += other.covered;
        self.total += other.total;
    }
}

/// A named subset of the source tree governed by one threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    /// Non-empty list of patterns (`./pkg/...` or glob form).
    #[serde(rename = "match")]
    pub matches: Vec<String>,
    /// Effective threshold falls back to the policy default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

impl Domain {
    pub fn effective_min(&self, policy: &Policy) -> f64 {
        self.min.unwrap_or(policy.default_min)
    }
}

/// The coverage policy: domains in priority order plus global excludes.
///
/// Declaration order is the tie-break for file assignment: the first
/// matching domain wins, so narrow domains go before broad ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub default_min: f64,
    pub domains: Vec<Domain>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl Policy {
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }
}

/// In-source override for one file, scanned from its leading lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub ignore: bool,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Pass,
    Fail,
    /// No files were assigned to the domain; reported as a warning but
    /// never fails the run.
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    pub name: String,
    pub covered: u64,
    pub total: u64,
    pub percent: f64,
    pub min: f64,
    pub status: DomainStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    /// Empty string for files matched by no domain.
    pub domain: String,
    pub covered: u64,
    pub total: u64,
    pub percent: f64,
}

/// The outcome of one evaluation. Domains mirror policy order; files are
/// sorted by path, so identical inputs render byte-identical JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub passed: bool,
    pub overall: CoverageStat,
    pub overall_percent: f64,
    pub domains: Vec<DomainReport>,
    pub files: Vec<FileReport>,
    pub warnings: Vec<String>,
}

impl Report {
    /// Convert a failing report into the error-carrying form.
    pub fn ensure_passed(self) -> crate::Result<Report> {
        if self.passed {
            Ok(self)
        } else {
            Err(crate::Error::PolicyViolation(Box::new(self)))
        }
    }
}

/// Per-domain snapshot stored in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSnapshot {
    pub name: String,
    pub percent: f64,
    pub min: f64,
    pub status: DomainStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub overall: f64,
    pub domains: BTreeMap<String, DomainSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl HistoryEntry {
    /// Snapshot a report at the current instant.
    pub fn from_report(report: &Report, commit: Option<String>, branch: Option<String>) -> Self {
        let domains = report
            .domains
            .iter()
            .map(|d| {
                (
                    d.name.clone(),
                    DomainSnapshot {
                        name: d.name.clone(),
                        percent: d.percent,
                        min: d.min,
                        status: d.status,
                    },
                )
            })
            .collect();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            overall: report.overall_percent,
            domains,
            commit,
            branch,
        }
    }
}

/// Append-only run history, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}
