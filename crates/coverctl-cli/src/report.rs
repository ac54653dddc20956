//! Rendering for finished reports. Formatters receive complete results
//! and never re-compute; warnings go to stderr, data to stdout.

use crate::cli::args::OutputFormat;
use anyhow::Result;
use coverctl_core::analytics::compare::CompareReport;
use coverctl_core::analytics::debt::DebtReport;
use coverctl_core::analytics::delta::DeltaReport;
use coverctl_core::analytics::ratchet::RatchetCheck;
use coverctl_core::analytics::suggest::Suggestion;
use coverctl_core::analytics::trend::{Direction, TrendReport};
use coverctl_core::model::{DomainStatus, Report};
use coverctl_core::orchestrate::CheckOutcome;
use serde::Serialize;

#[derive(Serialize)]
struct CheckJson<'a> {
    #[serde(flatten)]
    report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    ratchet: Option<&'a RatchetCheck>,
}

pub fn render_check(outcome: &CheckOutcome, format: OutputFormat) -> Result<()> {
    let report = &outcome.report;
    match format {
        OutputFormat::Json => {
            let doc = CheckJson {
                report,
                ratchet: outcome.ratchet.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Brief => {
            let failed = report
                .domains
                .iter()
                .filter(|d| d.status == DomainStatus::Fail)
                .count();
            println!(
                "coverctl: {} overall={:.2}% failed={} warnings={}",
                if outcome.passed() { "pass" } else { "fail" },
                report.overall_percent,
                failed,
                report.warnings.len()
            );
        }
        OutputFormat::Html => print!("{}", render_html(report)),
        OutputFormat::Text => {
            print_warnings(report);
            println!("{:<16} {:>9} {:>8} {:>7}  status", "domain", "covered", "percent", "min");
            for d in &report.domains {
                println!(
                    "{:<16} {:>4}/{:<4} {:>7.1}% {:>6.1}%  {}",
                    d.name,
                    d.covered,
                    d.total,
                    d.percent,
                    d.min,
                    status_word(d.status),
                );
            }
            println!();
            println!(
                "overall: {:.1}% ({}/{} statements): {}",
                report.overall_percent,
                report.overall.covered,
                report.overall.total,
                if outcome.passed() { "PASS" } else { "FAIL" }
            );
            if let Some(ratchet) = &outcome.ratchet {
                match ratchet.floor {
                    Some(floor) if !ratchet.passed => println!(
                        "ratchet: FAIL ({:.2}% < last recorded {:.2}%)",
                        ratchet.current, floor
                    ),
                    Some(floor) => {
                        println!("ratchet: ok (last recorded {:.2}%)", floor)
                    }
                    None => println!("ratchet: ok (no recorded runs)"),
                }
            }
        }
    }
    Ok(())
}

pub fn render_delta(delta: &DeltaReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(delta)?),
        OutputFormat::Brief => match delta.overall {
            Some(d) => println!("coverctl: delta overall={:+.2}%", d),
            None => println!("coverctl: delta overall=n/a"),
        },
        _ => {
            match (delta.overall, &delta.baseline_at) {
                (Some(d), Some(at)) => {
                    println!("overall: {:+.2}% since {}", d, at);
                }
                _ => println!("overall: no recorded baseline"),
            }
            for (name, d) in &delta.domains {
                match d {
                    Some(d) => println!("  {:<16} {:+.2}%", name, d),
                    None => println!("  {:<16} (new)", name),
                }
            }
        }
    }
    Ok(())
}

pub fn render_trend(trend: &TrendReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(trend)?),
        OutputFormat::Brief => println!(
            "coverctl: trend {} delta={:+.2}%",
            direction_word(trend.trend.direction),
            trend.trend.delta
        ),
        _ => {
            if trend.entries.is_empty() {
                println!("no recorded runs");
                return Ok(());
            }
            for point in &trend.entries {
                println!(
                    "{}  {:6.2}%  {}",
                    point.timestamp,
                    point.overall,
                    direction_arrow(point.trend.direction)
                );
            }
            println!();
            println!(
                "trend: {} ({:+.2}%)",
                direction_word(trend.trend.direction),
                trend.trend.delta
            );
            for (name, t) in &trend.by_domain {
                println!("  {:<16} {} ({:+.2}%)", name, direction_word(t.direction), t.delta);
            }
        }
    }
    Ok(())
}

pub fn render_debt(debt: &DebtReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(debt)?),
        OutputFormat::Brief => println!(
            "coverctl: debt health={:.1} failing={}",
            debt.health,
            debt.items.len()
        ),
        _ => {
            if debt.items.is_empty() {
                println!("no coverage debt (health 100.0)");
                return Ok(());
            }
            println!("{:<16} {:>8} {:>7} {:>10} {:>12}", "domain", "percent", "min", "shortfall", "lines needed");
            for item in &debt.items {
                println!(
                    "{:<16} {:>7.1}% {:>6.1}% {:>9.1}% {:>12}",
                    item.domain, item.percent, item.min, item.shortfall, item.lines_needed
                );
            }
            println!();
            println!("health: {:.1}/100", debt.health);
        }
    }
    Ok(())
}

pub fn render_suggestions(suggestions: &[Suggestion], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(suggestions)?),
        OutputFormat::Brief => {
            let parts: Vec<String> = suggestions
                .iter()
                .map(|s| format!("{}={}", s.domain, s.suggested_min))
                .collect();
            println!("coverctl: suggest {}", parts.join(" "));
        }
        _ => {
            for s in suggestions {
                println!(
                    "{:<16} {:>6.1}% -> min {:.0}  ({})",
                    s.domain, s.current_percent, s.suggested_min, s.reason
                );
            }
        }
    }
    Ok(())
}

pub fn render_compare(cmp: &CompareReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cmp)?),
        OutputFormat::Brief => println!(
            "coverctl: compare overall={:+.2}% improved={} regressed={}",
            cmp.overall_delta,
            cmp.improved.len(),
            cmp.regressed.len()
        ),
        _ => {
            println!(
                "overall: {:.2}% -> {:.2}% ({:+.2}%)",
                cmp.base_percent, cmp.head_percent, cmp.overall_delta
            );
            for (name, d) in &cmp.domains {
                println!("  {:<16} {:+.2}%", name, d);
            }
            if !cmp.improved.is_empty() {
                println!("\nimproved:");
                for f in &cmp.improved {
                    println!("  {} {:.1}% -> {:.1}%", f.path, f.base, f.head);
                }
            }
            if !cmp.regressed.is_empty() {
                println!("\nregressed:");
                for f in &cmp.regressed {
                    println!("  {} {:.1}% -> {:.1}%", f.path, f.base, f.head);
                }
            }
            println!("\nunchanged: {} file(s)", cmp.unchanged.len());
        }
    }
    Ok(())
}

fn print_warnings(report: &Report) {
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn status_word(status: DomainStatus) -> &'static str {
    match status {
        DomainStatus::Pass => "pass",
        DomainStatus::Fail => "FAIL",
        DomainStatus::Unknown => "unknown",
    }
}

fn direction_word(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Flat => "flat",
    }
}

fn direction_arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Flat => "→",
    }
}

fn render_html(report: &Report) -> String {
    let mut rows = String::new();
    for d in &report.domains {
        rows.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td></tr>\n",
            status_word(d.status),
            d.name,
            d.covered,
            d.total,
            d.percent,
            d.min,
            status_word(d.status),
        ));
    }
    let mut files = String::new();
    for f in &report.files {
        files.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td></tr>\n",
            f.path,
            if f.domain.is_empty() { "(none)" } else { &f.domain },
            f.percent,
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>coverctl report</title>\n\
         <style>body{{font-family:sans-serif}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:4px 8px}}\
         tr.FAIL td{{background:#fdd}}tr.pass td{{background:#dfd}}</style></head>\n\
         <body><h1>coverctl: {}</h1>\n\
         <p>overall {:.1}% ({}/{} statements)</p>\n\
         <table><tr><th>domain</th><th>covered</th><th>percent</th><th>min</th><th>status</th></tr>\n{}</table>\n\
         <h2>files</h2>\n<table><tr><th>path</th><th>domain</th><th>percent</th></tr>\n{}</table>\n\
         </body></html>\n",
        if report.passed { "PASS" } else { "FAIL" },
        report.overall_percent,
        report.overall.covered,
        report.overall.total,
        rows,
        files,
    )
}
