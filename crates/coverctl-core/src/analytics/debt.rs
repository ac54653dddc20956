//! Coverage debt: how far failing domains are from their thresholds and
//! roughly how many statements need tests to close the gap.

use crate::model::{DomainStatus, Report};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DebtItem {
    pub domain: String,
    pub percent: f64,
    pub min: f64,
    pub shortfall: f64,
    /// `ceil(min/100 * total) - covered`: statements to cover before the
    /// domain clears its threshold.
    pub lines_needed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebtReport {
    /// Failing domains, worst shortfall first.
    pub items: Vec<DebtItem>,
    /// 100 when debt-free, degrading with the mean shortfall across
    /// failing domains.
    pub health: f64,
}

pub fn compute(report: &Report) -> DebtReport {
    let mut items: Vec<DebtItem> = report
        .domains
        .iter()
        .filter(|d| d.status == DomainStatus::Fail)
        .map(|d| {
            let needed = (d.min / 100.0 * d.total as f64).ceil() as u64;
            DebtItem {
                domain: d.name.clone(),
                percent: d.percent,
                min: d.min,
                shortfall: d.min - d.percent,
                lines_needed: needed.saturating_sub(d.covered),
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.shortfall
            .partial_cmp(&a.shortfall)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.domain.cmp(&b.domain))
    });

    let health = if items.is_empty() {
        100.0
    } else {
        let total_shortfall: f64 = items.iter().map(|i| i.shortfall).sum();
        (100.0 * (1.0 - total_shortfall / (100.0 * items.len() as f64))).clamp(0.0, 100.0)
    };

    DebtReport { items, health }
}
