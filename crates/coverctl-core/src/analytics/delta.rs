//! Coverage movement versus the most recent history entry.

use crate::model::{History, Report};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct DeltaReport {
    /// Current minus previous overall; `None` without history.
    pub overall: Option<f64>,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_at: Option<String>,
    /// Per-domain delta; `None` for domains the previous entry lacked.
    pub domains: BTreeMap<String, Option<f64>>,
}

pub fn compute(report: &Report, history: &History) -> DeltaReport {
    let previous = history.last();

    let domains = report
        .domains
        .iter()
        .map(|d| {
            let delta = previous
                .and_then(|entry| entry.domains.get(&d.name))
                .map(|snap| d.percent - snap.percent);
            (d.name.clone(), delta)
        })
        .collect();

    DeltaReport {
        overall: previous.map(|entry| report.overall_percent - entry.overall),
        current: report.overall_percent,
        baseline_at: previous.map(|entry| entry.timestamp.clone()),
        domains,
    }
}
