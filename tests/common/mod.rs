use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary homes live for the whole test run.
static TEST_HOMES: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct CliOutput {
    pub stdout: String,
    #[allow(dead_code)]
    pub stderr: String,
}

/// Runs `bookstore_cli` against an isolated home directory with a scripted
/// keyboard.
pub struct BookstoreHarness {
    home: PathBuf,
}

impl BookstoreHarness {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let home = temp.path().to_path_buf();
        TEST_HOMES.lock().expect("lock temp dir registry").push(temp);
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    #[allow(dead_code)]
    pub fn catalog_path(&self) -> PathBuf {
        self.home.join("catalog.json")
    }

    #[allow(dead_code)]
    pub fn catalog_json(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.catalog_path()).expect("read catalog file");
        serde_json::from_str(&raw).expect("catalog file is valid json")
    }

    /// Runs the CLI and fails the test on a non-zero exit.
    pub fn run(&self, keys: &str) -> CliOutput {
        let output = self.command(keys).output().expect("run bookstore_cli");
        if !output.status.success() {
            panic!(
                "bookstore_cli failed: status={}\nstdout:\n{}\nstderr:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn command(&self, keys: &str) -> Command {
        let mut cmd = Command::cargo_bin("bookstore_cli").expect("binary exists");
        cmd.env("BOOKSTORE_HOME", self.home())
            .env("BOOKSTORE_TEST_KEYS", keys)
            .env("BOOKSTORE_PAUSE_MS", "0")
            .env_remove("RUST_LOG");
        cmd
    }
}
