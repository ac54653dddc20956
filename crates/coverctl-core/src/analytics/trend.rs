//! Trend lines over recorded history.

use crate::model::History;
use serde::Serialize;
use std::collections::BTreeMap;

/// Movement smaller than this counts as flat.
pub const EPSILON: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Trend {
    pub direction: Direction,
    pub delta: f64,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        let direction = if delta > EPSILON {
            Direction::Up
        } else if delta < -EPSILON {
            Direction::Down
        } else {
            Direction::Flat
        };
        Self { direction, delta }
    }
}

/// One history entry with its direction versus the predecessor.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub timestamp: String,
    pub overall: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    /// Last entry versus its predecessor.
    pub trend: Trend,
    pub entries: Vec<TrendPoint>,
    /// Per-domain trend over the last two entries; domains missing from
    /// either entry have no defined predecessor delta and are omitted.
    pub by_domain: BTreeMap<String, Trend>,
}

pub fn compute(history: &History) -> TrendReport {
    let entries: Vec<TrendPoint> = history
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let delta = if i == 0 {
                0.0
            } else {
                entry.overall - history.entries[i - 1].overall
            };
            TrendPoint {
                timestamp: entry.timestamp.clone(),
                overall: entry.overall,
                trend: Trend::from_delta(delta),
            }
        })
        .collect();

    let n = history.entries.len();
    let current = history.entries.last().map(|e| e.overall);
    let previous = n.checked_sub(2).and_then(|i| history.entries.get(i)).map(|e| e.overall);

    let by_domain = match (n.checked_sub(2).and_then(|i| history.entries.get(i)), history.entries.last()) {
        (Some(prev), Some(last)) => last
            .domains
            .iter()
            .filter_map(|(name, snap)| {
                prev.domains
                    .get(name)
                    .map(|p| (name.clone(), Trend::from_delta(snap.percent - p.percent)))
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    TrendReport {
        current,
        previous,
        trend: Trend::from_delta(match (previous, current) {
            (Some(p), Some(c)) => c - p,
            _ => 0.0,
        }),
        entries,
        by_domain,
    }
}
