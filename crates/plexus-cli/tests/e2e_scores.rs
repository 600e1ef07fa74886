//! E2E tests for the scoring and inspection commands:
//! `plexus degree|closeness|betweenness|all|stats`.
//!
//! Covers: JSON schema and values, text output, stdin input, config files,
//! and error codes for unreadable or malformed edge lists.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const PLAN: &str = "\
# two wings joined at the hall
hall kitchen
hall office
office store
kitchen,pantry
hall\tlounge
kitchen hall
store store
";

fn plexus_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plexus"));
    cmd.current_dir(dir);
    cmd.env("PLEXUS_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.env_remove("PLEXUS_TIMING");
    // Keep the developer's own config out of the run.
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd
}

fn write_plan(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write edge file");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = plexus_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("plexus should not crash");
    assert!(
        output.status.success(),
        "plexus {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn score_of(report: &Value, node: &str) -> f64 {
    report["scores"]
        .as_array()
        .expect("scores array")
        .iter()
        .find(|row| row["node"] == node)
        .and_then(|row| row["score"].as_f64())
        .unwrap_or_else(|| panic!("no score for {node}"))
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

#[test]
fn betweenness_json_ranks_hall_first() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let report = run_json(dir.path(), &["betweenness", "plan.txt"]);
    assert_eq!(report["metric"], "betweenness");
    assert_eq!(report["node_count"], 6);
    assert_eq!(report["edge_count"], 5);
    assert_eq!(report["scores"][0]["node"], "hall");

    // hall sits on 8 of the 10 pairs of other rooms.
    assert!((score_of(&report, "hall") - 0.8).abs() < 1e-12);
    assert!(score_of(&report, "lounge").abs() < 1e-12);
}

#[test]
fn betweenness_raw_reports_pair_counts() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let report = run_json(dir.path(), &["betweenness", "plan.txt", "--raw"]);
    assert_eq!(report["config"]["betweenness"]["normalized"], false);
    assert!((score_of(&report, "hall") - 8.0).abs() < 1e-12);
    assert!((score_of(&report, "office") - 4.0).abs() < 1e-12);
}

#[test]
fn closeness_flag_disables_correction_on_split_plan() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "split.txt", "a b\nc d\nd e\n");

    let wf = run_json(dir.path(), &["closeness", "split.txt"]);
    assert!((score_of(&wf, "a") - 0.25).abs() < 1e-12);
    assert!((score_of(&wf, "d") - 0.5).abs() < 1e-12);

    let plain = run_json(dir.path(), &["closeness", "split.txt", "--no-wf-improved"]);
    assert!((score_of(&plain, "a") - 1.0).abs() < 1e-12);
    assert!((score_of(&plain, "c") - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn degree_top_limits_rows() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let report = run_json(dir.path(), &["degree", "plan.txt", "--top", "2"]);
    let scores = report["scores"].as_array().expect("scores");
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0]["node"], "hall");
    assert!((scores[0]["score"].as_f64().unwrap() - 3.0 / 5.0).abs() < 1e-12);
}

#[test]
fn all_reports_every_metric_per_row() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let report = run_json(dir.path(), &["all", "plan.txt", "--sort", "degree"]);
    assert_eq!(report["sort"], "degree");
    let first = &report["scores"][0];
    assert_eq!(first["node"], "hall");
    for key in ["degree", "closeness", "betweenness"] {
        assert!(first[key].is_f64(), "{key} missing");
    }
}

#[test]
fn parallel_flag_gives_identical_json() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let seq = run_json(dir.path(), &["all", "plan.txt"]);
    let par = run_json(dir.path(), &["all", "plan.txt", "--parallel"]);
    assert_eq!(seq["scores"], par["scores"]);
}

#[test]
fn json_edge_file_with_numeric_ids() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.json", "[[101, 102], [102, 103], [null, null]]");

    let report = run_json(dir.path(), &["betweenness", "plan.json"]);
    assert_eq!(report["node_count"], 3);
    assert_eq!(report["scores"][0]["node"], 102);
}

#[test]
fn stdin_input_with_text_output() {
    let dir = TempDir::new().unwrap();

    plexus_cmd(dir.path())
        .args(["--format", "text", "degree", "-"])
        .write_stdin("a b\nb c\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("node\tdegree\nb\t1\n"));
}

#[test]
fn empty_edge_list_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "empty.txt", "# nothing adjoins\n");

    let report = run_json(dir.path(), &["closeness", "empty.txt"]);
    assert_eq!(report["node_count"], 0);
    assert_eq!(report["scores"].as_array().map(Vec::len), Some(0));
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[test]
fn stats_reports_drops_and_components() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    let report = run_json(dir.path(), &["stats", "plan.txt"]);
    assert_eq!(report["graph"]["node_count"], 6);
    assert_eq!(report["graph"]["component_count"], 1);
    assert_eq!(report["connected"], true);
    assert_eq!(report["build"]["records"], 7);
    assert_eq!(report["build"]["self_loops"], 1);
    assert_eq!(report["build"]["duplicates"], 1);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn project_config_sets_defaults_and_flags_override() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);
    write_plan(
        dir.path(),
        "plexus.toml",
        "[centrality]\nnormalized = false\n\n[output]\ntop = 1\n",
    );

    let report = run_json(dir.path(), &["betweenness", "plan.txt"]);
    assert_eq!(report["scores"].as_array().map(Vec::len), Some(1));
    assert!((score_of(&report, "hall") - 8.0).abs() < 1e-12);

    let report = run_json(dir.path(), &["betweenness", "plan.txt", "--top", "3"]);
    assert_eq!(report["scores"].as_array().map(Vec::len), Some(3));
}

#[test]
fn config_output_format_applies_without_flags() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);
    write_plan(dir.path(), "plexus.toml", "[output]\nformat = \"json\"\n");

    let output = plexus_cmd(dir.path())
        .args(["stats", "plan.txt"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json from config");
    assert_eq!(report["graph"]["edge_count"], 5);
}

#[test]
fn broken_config_fails_with_code() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);
    write_plan(dir.path(), "plexus.toml", "[centrality\n");

    plexus_cmd(dir.path())
        .args(["degree", "plan.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_file_reports_unreadable() {
    let dir = TempDir::new().unwrap();

    plexus_cmd(dir.path())
        .args(["degree", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn wrong_arity_reports_line_in_json_error() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "bad.txt", "a b\na b c\n");

    let output = plexus_cmd(dir.path())
        .args(["betweenness", "bad.txt", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let json_start = stderr.find('{').expect("json error on stderr");
    let mut stream = serde_json::Deserializer::from_str(&stderr[json_start..]).into_iter::<Value>();
    let error = stream.next().expect("one object").expect("valid json");
    assert_eq!(error["error"]["error_code"], "E1001");
    assert!(
        error["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("line 2"))
    );
}

#[test]
fn malformed_json_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "bad.json", "[[\"a\", \"b\"");

    plexus_cmd(dir.path())
        .args(["degree", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn timing_flag_writes_report_to_stderr() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.txt", PLAN);

    plexus_cmd(dir.path())
        .args(["--timing", "betweenness", "plan.txt", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("timing report:"))
        .stderr(predicate::str::contains("betweenness"));
}
