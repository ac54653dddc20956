//! End-to-end orchestrator flows over a real project tree (glob
//! resolution, annotation scanning, history recording), with fake diff
//! and runner seams where a VCS or toolchain would sit.

use coverctl_core::analytics::suggest::Strategy;
use coverctl_core::diff::DiffProvider;
use coverctl_core::errors::Error;
use coverctl_core::history::HistoryStore;
use coverctl_core::model::{Domain, DomainStatus, Policy};
use coverctl_core::orchestrate::{CheckOptions, Coverctl};
use coverctl_core::runner::{RunOptions, TestRunner};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

struct FakeDiff(Vec<String>);

impl DiffProvider for FakeDiff {
    fn changed_files(&self, _base_ref: &str) -> coverctl_core::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

struct FakeRunner {
    profile: PathBuf,
    content: &'static str,
}

impl TestRunner for FakeRunner {
    fn run(&self, _opts: &RunOptions) -> coverctl_core::Result<PathBuf> {
        std::fs::write(&self.profile, self.content).unwrap();
        Ok(self.profile.clone())
    }
}

fn policy() -> Policy {
    Policy {
        default_min: 80.0,
        domains: vec![Domain {
            name: "core".into(),
            matches: vec!["./core/...".into()],
            min: None,
        }],
        exclude: vec![],
    }
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("core")).unwrap();
    std::fs::write(dir.path().join("core/a.go"), "package core\n").unwrap();
    std::fs::write(dir.path().join("core/b.go"), "package core\n").unwrap();
    dir
}

fn write_profile(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const FAILING: &str = "mode: set\ncore/a.go:1.1,2.2 3 1\ncore/a.go:3.1,4.2 2 0\n";
const PASSING: &str = "mode: set\ncore/a.go:1.1,2.2 5 1\n";

#[test]
fn check_reports_failing_domain() {
    let dir = project();
    let profile = write_profile(dir.path(), "cover.out", FAILING);
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();

    let outcome = ctl
        .check(&CheckOptions {
            profiles: vec![profile],
            ..Default::default()
        })
        .unwrap();

    assert!(!outcome.passed());
    let core = &outcome.report.domains[0];
    assert_eq!((core.covered, core.total), (3, 5));
    assert_eq!(core.status, DomainStatus::Fail);
    assert!(matches!(
        outcome.into_result(),
        Err(Error::PolicyViolation(_))
    ));
}

#[test]
fn ignore_pragma_removes_a_file_from_aggregation() {
    let dir = project();
    std::fs::write(
        dir.path().join("core/b.go"),
        "// coverctl:ignore\npackage core\n",
    )
    .unwrap();
    let profile = write_profile(
        dir.path(),
        "cover.out",
        "mode: set\ncore/a.go:1.1,2.2 4 1\ncore/b.go:1.1,2.2 6 0\n",
    );
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();

    let outcome = ctl
        .check(&CheckOptions {
            profiles: vec![profile],
            ..Default::default()
        })
        .unwrap();

    assert!(outcome.passed());
    assert_eq!(outcome.report.domains[0].total, 4);
    assert!(!outcome.report.files.iter().any(|f| f.path == "core/b.go"));
}

#[test]
fn diff_scope_narrows_the_report() {
    let dir = project();
    let profile = write_profile(
        dir.path(),
        "cover.out",
        "mode: set\ncore/a.go:1.1,2.2 4 1\ncore/b.go:1.1,2.2 6 0\n",
    );
    let ctl = Coverctl::new(policy(), dir.path())
        .unwrap()
        .with_diff_provider(Box::new(FakeDiff(vec!["core/a.go".into()])));

    let outcome = ctl
        .check(&CheckOptions {
            profiles: vec![profile],
            diff_ref: Some("origin/main".into()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(outcome.report.files.len(), 1);
    assert_eq!(outcome.report.files[0].path, "core/a.go");
    assert!(outcome.passed());
}

#[test]
fn runner_produces_the_profile_when_none_is_given() {
    let dir = project();
    let ctl = Coverctl::new(policy(), dir.path())
        .unwrap()
        .with_runner(Box::new(FakeRunner {
            profile: dir.path().join("run.out"),
            content: PASSING,
        }));

    let outcome = ctl.check(&CheckOptions::default()).unwrap();
    assert!(outcome.passed());
    assert_eq!(outcome.report.domains[0].covered, 5);
}

#[test]
fn missing_profile_without_runner_is_a_usage_error() {
    let dir = project();
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();
    assert!(matches!(
        ctl.check(&CheckOptions::default()),
        Err(Error::Usage(_))
    ));
}

#[test]
fn record_then_delta_sees_the_previous_run() {
    let dir = project();
    let failing = write_profile(dir.path(), "first.out", FAILING);
    let passing = write_profile(dir.path(), "second.out", PASSING);
    let store = HistoryStore::new(dir.path().join("history.json"));
    let ctl = Coverctl::new(policy(), dir.path())
        .unwrap()
        .with_history(store);

    ctl.check(&CheckOptions {
        profiles: vec![failing],
        record: true,
        ..Default::default()
    })
    .unwrap();

    let delta = ctl.delta(&[passing]).unwrap();
    // 60% recorded, 100% now.
    assert!((delta.overall.unwrap() - 40.0).abs() < 1e-9);
    assert!((delta.domains["core"].unwrap() - 40.0).abs() < 1e-9);
}

#[test]
fn ratchet_mode_fails_a_regression() {
    let dir = project();
    let passing = write_profile(dir.path(), "first.out", PASSING);
    let failing = write_profile(dir.path(), "second.out", FAILING);
    let ctl = Coverctl::new(policy(), dir.path())
        .unwrap()
        .with_history(HistoryStore::new(dir.path().join("history.json")));

    ctl.check(&CheckOptions {
        profiles: vec![passing],
        record: true,
        ..Default::default()
    })
    .unwrap();

    let outcome = ctl
        .check(&CheckOptions {
            profiles: vec![failing.clone()],
            ratchet: true,
            fail_under: Some(0.0),
            ..Default::default()
        })
        .unwrap();
    assert!(!outcome.ratchet.as_ref().unwrap().passed);
    assert!(!outcome.passed());
}

#[test]
fn suggest_apply_re_emits_policy() {
    let dir = project();
    let profile = write_profile(dir.path(), "cover.out", FAILING);
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();

    let suggestions = ctl.suggest(&[profile], Strategy::Current).unwrap();
    let updated = ctl.suggest_apply(&suggestions);
    // 60% measured, floor -> 60.
    assert_eq!(updated.domains[0].min, Some(60.0));
}

#[test]
fn compare_flags_regressed_files() {
    let dir = project();
    let base = write_profile(dir.path(), "base.out", PASSING);
    let head = write_profile(dir.path(), "head.out", FAILING);
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();

    let cmp = ctl.compare(&base, &head).unwrap();
    assert!(cmp.overall_delta < 0.0);
    assert_eq!(cmp.regressed.len(), 1);
    assert_eq!(cmp.regressed[0].path, "core/a.go");
}

#[test]
fn cancellation_short_circuits_promptly() {
    let dir = project();
    let profile = write_profile(dir.path(), "cover.out", PASSING);
    let token = CancellationToken::new();
    token.cancel();
    let ctl = Coverctl::new(policy(), dir.path())
        .unwrap()
        .with_cancellation(token);

    assert!(matches!(
        ctl.check(&CheckOptions {
            profiles: vec![profile],
            ..Default::default()
        }),
        Err(Error::Canceled)
    ));
}

#[test]
fn identical_checks_render_identical_json() {
    let dir = project();
    let profile = write_profile(dir.path(), "cover.out", FAILING);
    let ctl = Coverctl::new(policy(), dir.path()).unwrap();
    let opts = CheckOptions {
        profiles: vec![profile],
        ..Default::default()
    };

    let a = ctl.check(&opts).unwrap().report;
    let b = ctl.check(&opts).unwrap().report;
    assert_eq!(
        serde_json::to_vec(&a).unwrap(),
        serde_json::to_vec(&b).unwrap()
    );
}
