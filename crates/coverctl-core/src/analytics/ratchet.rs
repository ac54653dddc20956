//! Ratchet enforcement: overall coverage may never drop below the last
//! recorded run. Equality passes; the check is orthogonal to
//! `--fail-under`.

use crate::model::{History, Report};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RatchetCheck {
    pub passed: bool,
    pub current: f64,
    /// The floor taken from history; `None` when no run was recorded
    /// yet, in which case the check vacuously passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
}

pub fn check(report: &Report, history: &History) -> RatchetCheck {
    let floor = history.last().map(|entry| entry.overall);
    RatchetCheck {
        passed: floor.map(|f| report.overall_percent >= f).unwrap_or(true),
        current: report.overall_percent,
        floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageStat, HistoryEntry};
    use std::collections::BTreeMap;

    fn report(overall: f64) -> Report {
        Report {
            passed: true,
            overall: CoverageStat::new(0, 0),
            overall_percent: overall,
            domains: vec![],
            files: vec![],
            warnings: vec![],
        }
    }

    fn history(overall: f64) -> History {
        History {
            entries: vec![HistoryEntry {
                timestamp: "t0".into(),
                overall,
                domains: BTreeMap::new(),
                commit: None,
                branch: None,
            }],
        }
    }

    #[test]
    fn drop_below_last_overall_fails() {
        // Last recorded 80.0, current 79.9.
        let result = check(&report(79.9), &history(80.0));
        assert!(!result.passed);
        assert_eq!(result.floor, Some(80.0));
    }

    #[test]
    fn equality_passes() {
        assert!(check(&report(80.0), &history(80.0)).passed);
    }

    #[test]
    fn improvement_passes() {
        assert!(check(&report(80.1), &history(80.0)).passed);
    }

    #[test]
    fn empty_history_passes_vacuously() {
        let result = check(&report(10.0), &History::default());
        assert!(result.passed);
        assert!(result.floor.is_none());
    }
}
