//! Coverage profile parsing and merging.
//!
//! The profile is the line-oriented text format emitted by the native
//! coverage tool:
//!
//! ```text
//! mode: set
//! example.com/app/core/a.go:1.1,2.2 3 1
//! example.com/app/core/a.go:3.1,4.2 2 0
//! ```
//!
//! Block lines have the shape `<file>:<sl>.<sc>,<el>.<ec> <stmts> <count>`.
//! Each block is keyed by the whole `<file>:<start>,<end>` token, which
//! uniquely identifies it across runs and makes merging by key possible.

use crate::errors::{Error, Result};
use crate::model::CoverageStat;
use std::collections::BTreeMap;
use std::path::Path;

/// One parsed profile: `file -> line key -> stat`.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub mode: String,
    pub files: BTreeMap<String, BTreeMap<String, CoverageStat>>,
    pub warnings: Vec<String>,
}

/// N profiles merged and collapsed to per-file stats.
#[derive(Debug, Clone, Default)]
pub struct MergedCoverage {
    pub files: BTreeMap<String, CoverageStat>,
    pub warnings: Vec<String>,
}

pub fn parse_file(path: &Path) -> Result<Profile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("failed to read profile {}", path.display()), e))?;
    parse(&text).map_err(|e| match e {
        Error::ProfileFormat(msg) => Error::ProfileFormat(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

pub fn parse(text: &str) -> Result<Profile> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::ProfileFormat("empty profile".into()))?;
    let mode = header
        .trim()
        .strip_prefix("mode:")
        .ok_or_else(|| Error::ProfileFormat("missing mode header".into()))?
        .trim()
        .to_string();

    let mut profile = Profile {
        mode,
        files: BTreeMap::new(),
        warnings: Vec::new(),
    };

    for (idx, line) in lines {
        let (file, key, stat) = parse_block(line.trim())
            .ok_or_else(|| Error::ProfileFormat(format!("malformed block on line {}", idx + 1)))?;
        merge_block(
            profile.files.entry(file).or_default(),
            key,
            stat,
            &mut profile.warnings,
        );
    }

    profile.warnings.sort();
    profile.warnings.dedup();
    Ok(profile)
}

/// Split one block line into `(file, line key, stat)`.
///
/// The file portion ends at the last `:` so Windows drive letters in
/// paths survive.
fn parse_block(line: &str) -> Option<(String, String, CoverageStat)> {
    let colon = line.rfind(':')?;
    let file = &line[..colon];
    let rest = &line[colon + 1..];
    if file.is_empty() {
        return None;
    }

    let mut parts = rest.split_whitespace();
    let range = parts.next()?;
    let stmts: u64 = parts.next()?.parse().ok()?;
    let count: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    // Sanity-check the block geometry so a stray `a:b c d` line is
    // rejected rather than silently counted.
    let (start, end) = range.split_once(',')?;
    if !start.contains('.') || !end.contains('.') {
        return None;
    }

    let covered = if count > 0 { stmts } else { 0 };
    Some((
        file.to_string(),
        format!("{}:{}", file, range),
        CoverageStat::new(covered, stmts),
    ))
}

/// Fold one block into a per-file key map. A repeated key keeps the max
/// covered value, so a block that ran anywhere stays covered; diverging
/// statement counts are a warning, and the max is kept to stay
/// merge-order independent.
fn merge_block(
    keys: &mut BTreeMap<String, CoverageStat>,
    key: String,
    stat: CoverageStat,
    warnings: &mut Vec<String>,
) {
    match keys.get_mut(&key) {
        None => {
            keys.insert(key, stat);
        }
        Some(existing) => {
            if existing.total != stat.total {
                warnings.push(format!(
                    "block {} has diverging statement counts ({} vs {})",
                    key, existing.total, stat.total
                ));
            }
            existing.total = existing.total.max(stat.total);
            existing.covered = existing.covered.max(stat.covered);
        }
    }
}

/// Merge N profiles: union of line keys per file, covered maxed across
/// profiles, then collapse to per-file sums. Additive coverage across
/// unit and integration runs without double-counting statements.
pub fn merge(profiles: &[Profile]) -> MergedCoverage {
    let mut keys_by_file: BTreeMap<String, BTreeMap<String, CoverageStat>> = BTreeMap::new();
    let mut warnings: Vec<String> = Vec::new();

    for profile in profiles {
        warnings.extend(profile.warnings.iter().cloned());
        for (file, keys) in &profile.files {
            let target = keys_by_file.entry(file.clone()).or_default();
            for (key, stat) in keys {
                merge_block(target, key.clone(), *stat, &mut warnings);
            }
        }
    }

    let files = keys_by_file
        .into_iter()
        .map(|(file, keys)| {
            let mut sum = CoverageStat::default();
            for stat in keys.values() {
                sum.add(*stat);
            }
            (file, sum)
        })
        .collect();

    warnings.sort();
    warnings.dedup();
    MergedCoverage { files, warnings }
}

/// Parse every path and merge the results.
pub fn load_and_merge(paths: &[std::path::PathBuf]) -> Result<MergedCoverage> {
    let mut profiles = Vec::with_capacity(paths.len());
    for path in paths {
        profiles.push(parse_file(path)?);
    }
    Ok(merge(&profiles))
}
