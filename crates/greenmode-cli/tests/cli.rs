//! cli.rs
//!
//! Black-box tests of the `greenmode` binary:
//! - `run` writes `.coafile.green` and leaves no project data behind
//! - same project => same file byte-for-byte
//! - `--json` output parses

use std::fs;
use std::path::Path;

use assert_cmd::Command;

fn touch(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "main.py", "import os\n\nprint(os.getcwd())\n");
    touch(tmp.path(), "lib/helpers.py", "def twice(x):\n    return x * 2\n");
    tmp
}

fn greenmode() -> Command {
    Command::cargo_bin("greenmode").unwrap()
}

#[test]
fn run_writes_green_config() {
    let tmp = project();
    greenmode()
        .args(["run", "--sequential"])
        .arg(tmp.path())
        .assert()
        .success();

    let text = fs::read_to_string(tmp.path().join(".coafile.green")).unwrap();
    assert!(text.starts_with("[all]\nignore = "));
    assert!(text.contains("[all.LineLengthBear1]"));
    assert!(text.contains("bears = SpaceConsistencyBear"));
    assert!(!tmp.path().join(".project_data.yaml").exists());
}

#[test]
fn run_is_deterministic() {
    let tmp = project();
    let mut outputs = Vec::new();
    for _ in 0..2 {
        greenmode()
            .args(["run", "--jobs", "2"])
            .arg(tmp.path())
            .assert()
            .success();
        outputs.push(fs::read(tmp.path().join(".coafile.green")).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn dry_run_with_suffix_writes_nothing() {
    let tmp = project();
    let out = greenmode()
        .args(["run", "--sequential", "--dry-run", "--suffix", ".new"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("[all.LineLengthBear1]"));
    assert!(!tmp.path().join(".coafile.green.new").exists());
}

#[test]
fn json_run_reports_stats() {
    let tmp = project();
    let out = greenmode()
        .args(["--json", "run", "--sequential", "--suffix", ".json-test"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["stats"]["files"], 2);
    assert_eq!(v["stats"]["bears"], 4);
    assert!(v["written"].as_str().unwrap().ends_with(".coafile.green.json-test"));
}

#[test]
fn missing_project_fails() {
    greenmode()
        .args(["run", "/definitely/not/a/project"])
        .assert()
        .failure();
}

#[test]
fn bears_lists_builtin_bears() {
    let out = greenmode().args(["--json", "bears"]).output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["DuplicateContentBear", "LineCountBear", "LineLengthBear", "SpaceConsistencyBear"]
    );
}

#[test]
fn settings_shows_domains() {
    let out = greenmode()
        .args(["--json", "settings", "LineLengthBear"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v[0]["bear"], "LineLengthBear");
    assert_eq!(v[0]["domains"]["max_line_length"]["domain"], "type2");

    greenmode().args(["settings", "NoSuchBear"]).assert().failure();
}

#[test]
fn snapshot_dumps_project_data() {
    let tmp = project();
    let out = greenmode().arg("snapshot").arg(tmp.path()).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("main.py"));
    assert!(text.contains("max_lines_per_file"));
}
