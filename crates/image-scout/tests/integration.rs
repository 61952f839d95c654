use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn iscout_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("iscout");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // Disabled provider: every product resolves to the deterministic
    // fallback set, so these tests never touch the network.
    let config_content = format!(
        r#"[db]
path = "{}/data/tasks.sqlite"

[server]
bind = "127.0.0.1:7431"

[provider]
name = "disabled"

[scrape]
top_n = 3
retention_secs = 600
"#,
        root.display()
    );

    let config_path = config_dir.join("iscout.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_iscout(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = iscout_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run iscout binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_iscout(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_iscout(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_iscout(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_scrape_fallback_mode_end_to_end() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_iscout(
        &config_path,
        &["scrape", "--item", "Widget", "--domain", "example.com"],
    );
    assert!(success, "scrape failed: stdout={}, stderr={}", stdout, stderr);

    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(out["status"], "completed");
    assert!(!out["task_id"].as_str().unwrap().is_empty());

    let images = out["results"]["Widget"].as_array().unwrap();
    assert!(!images.is_empty() && images.len() <= 3);
    for (i, img) in images.iter().enumerate() {
        assert_eq!(img["rank"].as_u64().unwrap(), i as u64 + 1);
        let score = img["score"].as_f64().unwrap();
        assert!((0.0..=1.5).contains(&score), "score out of range: {}", score);
        assert_eq!(img["matched_domain"], "example.com");
    }
    // Fallback scores are fixed, so the top candidate is exact.
    assert_eq!(images[0]["score"].as_f64().unwrap(), 0.9);
}

#[test]
fn test_scrape_respects_top_n() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_iscout(
        &config_path,
        &[
            "scrape",
            "--item",
            "Widget",
            "--domain",
            "example.com",
            "--top-n",
            "1",
        ],
    );
    assert!(success);

    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let images = out["results"]["Widget"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["rank"].as_u64().unwrap(), 1);
}

#[test]
fn test_scrape_then_get_round_trips_through_the_store() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_iscout(
        &config_path,
        &[
            "scrape", "--item", "Widget", "--item", "Gadget", "--domain", "example.com",
        ],
    );
    assert!(success);

    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let task_id = out["task_id"].as_str().unwrap().to_string();
    assert_eq!(out["results"].as_object().unwrap().len(), 2);

    // A separate process has a cold cache; the durable layer must answer.
    let (stdout, stderr, success) = run_iscout(&config_path, &["get", &task_id]);
    assert!(success, "get failed: stderr={}", stderr);
    let got: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(got["status"], "completed");
    assert!(got["results"]["Gadget"].as_array().is_some());
}

#[test]
fn test_get_unknown_id_is_not_found() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_iscout(&config_path, &["get", "no-such-task"]);
    assert!(success, "not-found must be a normal outcome, not an error");
    let out: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(out["status"], "not_found");
}

#[test]
fn test_scrape_requires_items_and_domains() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success) = run_iscout(&config_path, &["scrape", "--domain", "example.com"]);
    assert!(!success, "scrape without --item must fail");

    let (_, _, success) = run_iscout(&config_path, &["scrape", "--item", "Widget"]);
    assert!(!success, "scrape without --domain must fail");
}
