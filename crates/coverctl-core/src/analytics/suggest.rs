//! Threshold suggestions from current coverage.

use crate::errors::{Error, Result};
use crate::model::{Policy, Report};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Lock in what exists: `floor(p)`.
    Current,
    /// Push upward: `min(100, floor(p) + 5)`.
    Aggressive,
    /// Ratchet slowly, never below the existing threshold:
    /// `max(min, floor(p) - 2)`.
    Conservative,
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "current" => Ok(Strategy::Current),
            "aggressive" => Ok(Strategy::Aggressive),
            "conservative" => Ok(Strategy::Conservative),
            other => Err(Error::Usage(format!(
                "unknown suggest strategy '{}' (current|aggressive|conservative)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Strategy::Current => "current",
            Strategy::Aggressive => "aggressive",
            Strategy::Conservative => "conservative",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub domain: String,
    pub current_percent: f64,
    pub current_min: f64,
    pub suggested_min: f64,
    pub reason: String,
}

pub fn compute(report: &Report, policy: &Policy, strategy: Strategy) -> Vec<Suggestion> {
    report
        .domains
        .iter()
        .map(|d| {
            let p = d.percent.floor();
            let suggested = match strategy {
                Strategy::Current => p,
                Strategy::Aggressive => (p + 5.0).min(100.0),
                Strategy::Conservative => (p - 2.0).max(d.min),
            };
            let reason = match strategy {
                Strategy::Current => {
                    format!("lock in the measured {:.1}% for {}", d.percent, d.name)
                }
                Strategy::Aggressive => {
                    format!("push {} five points past its measured {:.1}%", d.name, d.percent)
                }
                Strategy::Conservative => format!(
                    "allow {} two points of slack under {:.1}%, never below the current threshold",
                    d.name, d.percent
                ),
            };
            Suggestion {
                domain: d.name.clone(),
                current_percent: d.percent,
                current_min: d.min,
                suggested_min: suggested,
                reason,
            }
        })
        .collect()
}

/// Re-emit the policy with the suggested thresholds applied.
pub fn apply(policy: &Policy, suggestions: &[Suggestion]) -> Policy {
    let mut updated = policy.clone();
    for domain in &mut updated.domains {
        if let Some(s) = suggestions.iter().find(|s| s.domain == domain.name) {
            domain.min = Some(s.suggested_min);
        }
    }
    updated
}
