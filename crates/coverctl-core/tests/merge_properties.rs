//! Algebraic properties of profile merging.

use coverctl_core::model::CoverageStat;
use coverctl_core::profile::{merge, parse, MergedCoverage, Profile};
use std::collections::BTreeMap;

fn profile(lines: &[&str]) -> Profile {
    let mut text = String::from("mode: set\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    parse(&text).unwrap()
}

fn files(merged: &MergedCoverage) -> &BTreeMap<String, CoverageStat> {
    &merged.files
}

#[test]
fn merge_is_commutative() {
    let a = profile(&["core/a.go:1.1,2.2 3 1", "core/a.go:3.1,4.2 2 0"]);
    let b = profile(&["core/a.go:3.1,4.2 2 5", "core/b.go:1.1,9.9 7 1"]);

    let ab = merge(&[a.clone(), b.clone()]);
    let ba = merge(&[b, a]);
    assert_eq!(files(&ab), files(&ba));
    assert_eq!(ab.warnings, ba.warnings);
}

#[test]
fn merge_is_order_invariant() {
    // Permutation invariance of the key-level fold covers both
    // commutativity and associativity of the underlying per-key merge.
    let a = profile(&["core/a.go:1.1,2.2 3 1"]);
    let b = profile(&["core/a.go:1.1,2.2 3 0", "core/a.go:3.1,4.2 2 1"]);
    let c = profile(&["core/b.go:1.1,2.2 4 0", "core/a.go:3.1,4.2 2 0"]);

    let abc = merge(&[a.clone(), b.clone(), c.clone()]);
    let cab = merge(&[c.clone(), a.clone(), b.clone()]);
    let bca = merge(&[b, c, a]);
    assert_eq!(files(&abc), files(&cab));
    assert_eq!(files(&abc), files(&bca));
}

#[test]
fn merge_is_idempotent_on_identical_profiles() {
    let a = profile(&["core/a.go:1.1,2.2 3 1", "core/a.go:3.1,4.2 2 0"]);
    let once = merge(&[a.clone()]);
    let twice = merge(&[a.clone(), a]);
    assert_eq!(files(&once), files(&twice));
    assert!(twice.warnings.is_empty());
}

#[test]
fn s3_max_rule_across_profiles() {
    let a = profile(&["core/a.go:1.1,2.2 2 0"]);
    let b = profile(&["core/a.go:1.1,2.2 2 1"]);
    let merged = merge(&[a, b]);
    assert_eq!(merged.files["core/a.go"], CoverageStat::new(2, 2));
}

#[test]
fn merged_stats_respect_the_invariant() {
    let a = profile(&["x/a.go:1.1,2.2 5 9", "x/a.go:3.1,4.2 1 0", "y/b.go:1.1,2.2 2 1"]);
    let b = profile(&["x/a.go:1.1,2.2 5 0", "y/b.go:9.1,9.2 3 3"]);
    let merged = merge(&[a, b]);
    for stat in merged.files.values() {
        assert!(stat.covered <= stat.total);
    }
}
