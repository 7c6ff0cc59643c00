mod support;

use std::fs;

use predicates::str::contains;
use serde_json::Value;

use support::TestHome;

#[test]
fn export_then_import_restores_everything() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.login("alice", "pw");
    let id = home.new_task("Backed up", &["--priority", "High"]);
    home.cmd()
        .args(["task", "comment", &id, "keep this"])
        .assert()
        .success();

    let backup = home.data_dir().join("backup.json");
    home.cmd().arg("export").arg(&backup).assert().success();

    // wipe and restore into a fresh home
    let other = TestHome::new();
    other.register("alice", "pw");
    other.login("alice", "pw");
    other.cmd().arg("import").arg(&backup).assert().success();

    let value = other.json(&["task", "show", &id]);
    assert_eq!(value["data"]["title"], "Backed up");
    assert_eq!(value["data"]["priority"], "High");
    assert_eq!(value["data"]["comments"][0]["text"], "keep this");
}

#[test]
fn import_overwrites_matching_users_wholesale() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.login("alice", "pw");
    home.new_task("Original", &[]);

    let backup = home.data_dir().join("backup.json");
    home.cmd().arg("export").arg(&backup).assert().success();

    // a task created after the export disappears on import
    home.new_task("Afterwards", &[]);
    home.cmd().arg("import").arg(&backup).assert().success();

    let value = home.json(&["list"]);
    let titles: Vec<&str> = value["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Original"]);
}

#[test]
fn import_keeps_users_missing_from_the_snapshot() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.login("alice", "pw");
    let backup = home.data_dir().join("backup.json");
    home.cmd().arg("export").arg(&backup).assert().success();

    home.register("bob", "pw2");
    home.cmd().arg("import").arg(&backup).assert().success();

    // bob was not in the snapshot but survives the merge
    home.login("bob", "pw2");
}

#[test]
fn malformed_import_changes_nothing() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.login("alice", "pw");
    home.new_task("Safe", &[]);

    let before = fs::read_to_string(home.users_file()).unwrap();

    let bad = home.data_dir().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    home.cmd()
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .code(4)
        .stderr(contains("Malformed snapshot"));

    let after = fs::read_to_string(home.users_file()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn import_rejecting_duplicate_ids_is_atomic() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.register("bob", "pw");
    home.login("alice", "pw");
    let id = home.new_task("Mine", &[]);

    let before = fs::read_to_string(home.users_file()).unwrap();

    // craft a snapshot that gives bob a task with alice's id
    let mut snapshot: Value = serde_json::from_str(&before).unwrap();
    let task = snapshot["alice"]["tasks"][0].clone();
    snapshot["bob"]["tasks"] = serde_json::json!([task]);
    let bad = home.data_dir().join("dup.json");
    fs::write(&bad, serde_json::to_string(&snapshot).unwrap()).unwrap();

    home.cmd()
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .code(2)
        .stderr(contains(id.as_str()));

    let after = fs::read_to_string(home.users_file()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn export_without_output_uses_dated_filename() {
    let home = TestHome::new();
    home.register("alice", "pw");
    home.login("alice", "pw");
    home.new_task("Anything", &[]);

    let value = home.json(&["export"]);
    let path = value["data"]["path"].as_str().unwrap();
    assert!(path.starts_with("tasks_backup_"));
    assert!(path.ends_with(".json"));
    assert!(home.work_dir().join(path).is_file());
}
