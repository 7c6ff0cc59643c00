use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Directory commands run from (default export target)
    pub fn work_dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// A taskdeck command pointed at this home's data directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskdeck").expect("taskdeck binary");
        cmd.env("TASKDECK_DATA_DIR", self.data_dir());
        cmd.current_dir(self.dir.path());
        cmd
    }

    pub fn register(&self, username: &str, password: &str) {
        self.cmd()
            .args(["register", username, "--password", password])
            .assert()
            .success();
    }

    pub fn login(&self, username: &str, password: &str) {
        self.cmd()
            .args(["login", username, "--password", password])
            .assert()
            .success();
    }

    /// Create a task for the logged-in user and return its id
    pub fn new_task(&self, title: &str, extra_args: &[&str]) -> String {
        let mut args = vec!["task", "new", title, "--json"];
        args.extend_from_slice(extra_args);
        let output = self
            .cmd()
            .args(&args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("task new json");
        value["data"]["id"].as_str().expect("task id").to_string()
    }

    /// Run a command with `--json` and parse the envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let mut full = args.to_vec();
        full.push("--json");
        let output = self
            .cmd()
            .args(&full)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }
}
