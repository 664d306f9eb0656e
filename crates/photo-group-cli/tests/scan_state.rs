//! End-to-end tests for scanning, resuming, and the state commands.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn photo_group(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("photo-group").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .current_dir(home);
    cmd
}

/// Writes `count` files with distinct contents and returns their ids in scan order.
fn create_photos(dir: &Path, count: usize) -> Vec<String> {
    fs::create_dir_all(dir).unwrap();
    (0..count)
        .map(|i| {
            let path = dir.join(format!("IMG_{i:04}.jpg"));
            fs::write(&path, format!("pixels {i}")).unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect()
}

fn scan_json(home: &Path, photos: &Path, state: &Path) -> Value {
    let output = photo_group(home)
        .arg(photos)
        .arg("--state-dir")
        .arg(state)
        .arg("-q")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn all_ids(document: &Value) -> Vec<String> {
    let mut ids: Vec<String> = document["groups"]
        .as_object()
        .unwrap()
        .values()
        .chain(std::iter::once(&document["others"]))
        .flat_map(|ids| ids.as_array().unwrap().iter())
        .map(|id| id.as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

struct Fixture {
    temp: tempfile::TempDir,
    photos: PathBuf,
    state: PathBuf,
    ids: Vec<String>,
}

fn fixture(count: usize) -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let photos = temp.path().join("photos");
    let state = temp.path().join("state");
    let ids = create_photos(&photos, count);
    Fixture {
        temp,
        photos,
        state,
        ids,
    }
}

// === Scan ===

#[test]
fn test_scan_partitions_every_photo() {
    let fx = fixture(25);
    let document = scan_json(fx.temp.path(), &fx.photos, &fx.state);

    assert_eq!(document["total"], 25);
    assert_eq!(document["groups"].as_object().unwrap().len(), 20);
    assert_eq!(all_ids(&document), fx.ids);
}

#[test]
fn test_scan_persists_result_and_drops_checkpoint() {
    let fx = fixture(12);
    scan_json(fx.temp.path(), &fx.photos, &fx.state);

    assert!(fx.state.join("scanResult.json").is_file());
    assert!(!fx.state.join("scanProgress.json").exists());
}

#[test]
fn test_scan_is_deterministic() {
    let fx = fixture(15);
    let first = scan_json(fx.temp.path(), &fx.photos, &fx.state);
    let second = scan_json(fx.temp.path(), &fx.photos, &fx.state);

    assert_eq!(first["groups"], second["groups"]);
    assert_eq!(first["others"], second["others"]);
}

#[test]
fn test_scan_reports_checkpoints_on_stderr() {
    let fx = fixture(25);
    photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Scanned 10/25")
                .and(predicate::str::contains("Scanned 20/25"))
                .and(predicate::str::contains("Scanned 25/25")),
        );
}

#[test]
fn test_summary_format() {
    let fx = fixture(8);
    photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .args(["-q", "--format", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL").and(predicate::str::contains("8 photos")));
}

#[test]
fn test_seed_by_id_differs_from_content() {
    let fx = fixture(30);
    let by_content = scan_json(fx.temp.path(), &fx.photos, &fx.state);

    let output = photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .args(["-q", "--seed-by", "id"])
        .output()
        .unwrap();
    let by_id: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(all_ids(&by_id), fx.ids);
    assert_ne!(by_content["groups"], by_id["groups"]);
}

// === Resume ===

fn write_checkpoint(state: &Path, ids: &[String], total: usize) {
    fs::create_dir_all(state).unwrap();
    let checkpoint = json!({
        "processedCount": ids.len(),
        "totalCount": total,
        "buckets": { "a": ids },
        "others": [],
    });
    fs::write(state.join("scanProgress.json"), checkpoint.to_string()).unwrap();
}

#[test]
fn test_scan_resumes_pending_checkpoint() {
    let fx = fixture(34);
    write_checkpoint(&fx.state, &fx.ids[..20], 34);

    let output = photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Scanned 10/34"));
    assert!(stderr.contains("Scanned 30/34"));

    // The checkpointed items keep the bucket they were restored into.
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    let bucket_a: Vec<&str> = document["groups"]["a"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap())
        .collect();
    for id in &fx.ids[..20] {
        assert!(bucket_a.contains(&id.as_str()), "{id} not restored");
    }
    assert_eq!(all_ids(&document), fx.ids);
    assert!(!fx.state.join("scanProgress.json").exists());
}

#[test]
fn test_fresh_ignores_pending_checkpoint() {
    let fx = fixture(34);
    write_checkpoint(&fx.state, &fx.ids[..20], 34);

    photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .arg("--fresh")
        .assert()
        .success()
        .stderr(predicate::str::contains("Scanned 10/34"));
    assert!(!fx.state.join("scanProgress.json").exists());
}

#[test]
fn test_changed_collection_restarts() {
    let fx = fixture(34);
    write_checkpoint(&fx.state, &fx.ids[..20], 40);

    photo_group(fx.temp.path())
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .assert()
        .success()
        .stderr(predicate::str::contains("Scanned 10/34"));
}

// === Status / Show / Clear ===

#[test]
fn test_status_without_state() {
    let temp = tempfile::tempdir().unwrap();
    photo_group(temp.path())
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path().join("state"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Pending scan: none")
                .and(predicate::str::contains("Cached result: none")),
        );
}

#[test]
fn test_status_reports_pending_checkpoint() {
    let fx = fixture(34);
    write_checkpoint(&fx.state, &fx.ids[..20], 34);

    photo_group(fx.temp.path())
        .arg("status")
        .arg("--state-dir")
        .arg(&fx.state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending scan: 20/34 processed"));
}

#[test]
fn test_status_reports_cached_result() {
    let fx = fixture(25);
    scan_json(fx.temp.path(), &fx.photos, &fx.state);

    photo_group(fx.temp.path())
        .arg("status")
        .arg("--state-dir")
        .arg(&fx.state)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Pending scan: none")
                .and(predicate::str::contains("Cached result: 25 photos")),
        );
}

#[test]
fn test_show_without_result() {
    let temp = tempfile::tempdir().unwrap();
    photo_group(temp.path())
        .arg("show")
        .arg("--state-dir")
        .arg(temp.path().join("state"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No cached result"));
}

#[test]
fn test_show_prints_cached_result() {
    let fx = fixture(18);
    let scanned = scan_json(fx.temp.path(), &fx.photos, &fx.state);

    let output = photo_group(fx.temp.path())
        .arg("show")
        .arg("--state-dir")
        .arg(&fx.state)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(shown["groups"], scanned["groups"]);
    assert_eq!(shown["others"], scanned["others"]);
}

#[test]
fn test_show_prunes_deleted_photos() {
    let fx = fixture(18);
    scan_json(fx.temp.path(), &fx.photos, &fx.state);
    fs::remove_file(&fx.ids[3]).unwrap();

    let output = photo_group(fx.temp.path())
        .arg("show")
        .arg(&fx.photos)
        .arg("--state-dir")
        .arg(&fx.state)
        .output()
        .unwrap();
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(shown["total"], 17);
    assert!(!all_ids(&shown).contains(&fx.ids[3]));
}

#[test]
fn test_show_limits_result_to_given_roots() {
    let temp = tempfile::tempdir().unwrap();
    let first = temp.path().join("a");
    let second = temp.path().join("b");
    let state = temp.path().join("state");
    let first_ids = create_photos(&first, 4);
    create_photos(&first.join("nested"), 2);
    create_photos(&second, 5);

    let output = photo_group(temp.path())
        .arg(&first)
        .arg(&second)
        .arg("-r")
        .arg("--state-dir")
        .arg(&state)
        .arg("-q")
        .output()
        .unwrap();
    let scanned: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(scanned["total"], 11);

    let output = photo_group(temp.path())
        .arg("show")
        .arg(&first)
        .arg("--state-dir")
        .arg(&state)
        .output()
        .unwrap();
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["total"], 4);
    assert_eq!(all_ids(&shown), first_ids);

    let output = photo_group(temp.path())
        .arg("show")
        .arg(&first)
        .arg("-r")
        .arg("--state-dir")
        .arg(&state)
        .output()
        .unwrap();
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["total"], 6);
    assert!(all_ids(&shown).iter().all(|id| Path::new(id).starts_with(&first)));
}

#[test]
fn test_clear_removes_state() {
    let fx = fixture(12);
    scan_json(fx.temp.path(), &fx.photos, &fx.state);
    write_checkpoint(&fx.state, &fx.ids[..10], 12);

    photo_group(fx.temp.path())
        .arg("clear")
        .arg("--state-dir")
        .arg(&fx.state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared scan state"));

    assert!(!fx.state.join("scanResult.json").exists());
    assert!(!fx.state.join("scanProgress.json").exists());
}
