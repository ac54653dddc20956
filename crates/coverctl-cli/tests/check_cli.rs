use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"version: 1
policy:
  defaultMin: 80
  domains:
    - name: core
      match: ["./core/..."]
"#;

fn project(profile: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("core")).unwrap();
    fs::write(dir.path().join("core/a.go"), "package core\n").unwrap();
    fs::write(dir.path().join(".coverctl.yaml"), CONFIG).unwrap();
    fs::write(dir.path().join("cover.out"), profile).unwrap();
    dir
}

fn coverctl(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("coverctl").unwrap();
    cmd.current_dir(dir);
    cmd
}

const FAILING: &str = "mode: set\ncore/a.go:1.1,2.2 3 1\ncore/a.go:3.1,4.2 2 0\n";
const PASSING: &str = "mode: set\ncore/a.go:1.1,2.2 5 1\n";

#[test]
fn failing_check_exits_one() {
    let dir = project(FAILING);
    coverctl(dir.path())
        .args(["check", "--profile", "cover.out", "--format", "brief"])
        .assert()
        .code(1)
        .stdout(contains("coverctl: fail overall=60.00%"));
}

#[test]
fn passing_check_exits_zero() {
    let dir = project(PASSING);
    coverctl(dir.path())
        .args(["check", "--profile", "cover.out", "--format", "brief"])
        .assert()
        .success()
        .stdout(contains("coverctl: pass overall=100.00%"));
}

#[test]
fn json_report_carries_the_stable_schema() {
    let dir = project(FAILING);
    let output = coverctl(dir.path())
        .args(["check", "--profile", "cover.out", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["passed"], serde_json::json!(false));
    assert_eq!(doc["domains"][0]["name"], "core");
    assert_eq!(doc["domains"][0]["status"], "fail");
    assert_eq!(doc["files"][0]["path"], "core/a.go");
    assert!(doc["warnings"].is_array());
}

#[test]
fn malformed_profile_exits_three() {
    let dir = project("no mode header here\n");
    coverctl(dir.path())
        .args(["check", "--profile", "cover.out"])
        .assert()
        .code(3)
        .stderr(contains("profile error"));
}

#[test]
fn broken_config_exits_two() {
    let dir = project(PASSING);
    fs::write(dir.path().join(".coverctl.yaml"), "version: 9\n").unwrap();
    coverctl(dir.path())
        .args(["check", "--profile", "cover.out"])
        .assert()
        .code(2)
        .stderr(contains("config error"));
}

#[test]
fn init_writes_a_loadable_config_once() {
    let dir = TempDir::new().unwrap();
    coverctl(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".coverctl.yaml").exists());

    // A second init without --force refuses.
    coverctl(dir.path()).arg("init").assert().code(2);
    coverctl(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn suggest_current_floors_the_measured_percent() {
    // 84.7% measured, strategy current locks in the floor: 84.
    let dir = project(
        "mode: set\ncore/a.go:1.1,2.2 847 1\ncore/a.go:3.1,4.2 153 0\n",
    );
    let output = coverctl(dir.path())
        .args([
            "suggest",
            "--profile",
            "cover.out",
            "--strategy",
            "current",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc[0]["suggested_min"], serde_json::json!(84.0));
}

#[test]
fn suggest_apply_rewrites_the_config() {
    let dir = project(PASSING);
    coverctl(dir.path())
        .args([
            "suggest",
            "--profile",
            "cover.out",
            "--strategy",
            "conservative",
            "--apply",
        ])
        .assert()
        .success()
        .stderr(contains("updated"));

    let updated = fs::read_to_string(dir.path().join(".coverctl.yaml")).unwrap();
    // conservative on 100% with defaultMin 80: max(80, 98) = 98.
    assert!(updated.contains("min: 98"), "{updated}");
}

#[test]
fn record_then_delta_reports_movement() {
    let dir = project(FAILING);
    fs::write(dir.path().join("better.out"), PASSING).unwrap();

    coverctl(dir.path())
        .args(["check", "--profile", "cover.out", "--record", "--format", "brief"])
        .assert()
        .code(1);

    coverctl(dir.path())
        .args(["delta", "--profile", "better.out", "--format", "brief"])
        .assert()
        .success()
        .stdout(contains("delta overall=+40.00%"));
}

#[test]
fn ratchet_fails_a_regression_even_above_thresholds() {
    // Thresholds of zero keep the domains green; only the ratchet trips.
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("core")).unwrap();
    fs::write(
        dir.path().join(".coverctl.yaml"),
        "version: 1\npolicy:\n  defaultMin: 0\n  domains:\n    - name: core\n      match: [\"./core/...\"]\n",
    )
    .unwrap();
    fs::write(dir.path().join("high.out"), PASSING).unwrap();
    fs::write(dir.path().join("low.out"), FAILING).unwrap();

    coverctl(dir.path())
        .args(["check", "--profile", "high.out", "--record"])
        .assert()
        .success();

    coverctl(dir.path())
        .args(["check", "--profile", "low.out", "--ratchet", "--format", "brief"])
        .assert()
        .code(1);

    // Equal coverage passes the ratchet.
    coverctl(dir.path())
        .args(["check", "--profile", "high.out", "--ratchet"])
        .assert()
        .success();
}

#[test]
fn history_show_and_clear_roundtrip() {
    let dir = project(PASSING);
    coverctl(dir.path())
        .args(["check", "--profile", "cover.out", "--record"])
        .assert()
        .success();

    coverctl(dir.path())
        .args(["history", "show"])
        .assert()
        .success()
        .stdout(contains("100.00%"));

    coverctl(dir.path()).args(["history", "clear"]).assert().success();
    coverctl(dir.path())
        .args(["history", "show"])
        .assert()
        .success()
        .stdout(contains("no recorded runs"));
}

#[test]
fn debt_reports_lines_needed() {
    let dir = project(FAILING);
    let output = coverctl(dir.path())
        .args(["debt", "--profile", "cover.out", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["items"][0]["domain"], "core");
    // 3/5 at min 80: ceil(4) - 3 = 1 statement short.
    assert_eq!(doc["items"][0]["lines_needed"], serde_json::json!(1));
}

#[test]
fn compare_splits_files_by_movement() {
    let dir = project(PASSING);
    fs::write(dir.path().join("head.out"), FAILING).unwrap();
    let output = coverctl(dir.path())
        .args([
            "compare",
            "--base",
            "cover.out",
            "--head",
            "head.out",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["regressed"][0]["path"], "core/a.go");
    assert_eq!(doc["overall_delta"], serde_json::json!(-40.0));
}
