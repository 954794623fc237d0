//! Common test utilities for the appdeck binary
//!
//! Runs the compiled CLI against app directories living in temporary
//! directories, with the local store redirected into the same sandbox.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const CURRENT_CONFIG: &str = r#"name = "my app"
client_id = "12345"
application_url = "https://example.com/lala"
embedded = true

[access_scopes]
scopes = "read_products,write_orders"

[auth]
redirect_urls = ["https://example.com/auth/callback"]

[webhooks]
api_version = "2023-07"
"#;

/// Sandbox holding an app directory and a private store directory
pub struct Sandbox {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("app")).unwrap();
        Self { _temp: temp, root }
    }

    pub fn app_dir(&self) -> Utf8PathBuf {
        self.root.join("app")
    }

    /// Write a file relative to the app directory
    pub fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.app_dir().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Run the CLI with `--path` pointing at the app directory
    pub fn run(&self, args: &[&str]) -> CliOutput {
        self.run_in(&self.app_dir(), args)
    }

    pub fn run_in(&self, path: &Utf8Path, args: &[&str]) -> CliOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_appdeck"))
            .args(args)
            .arg("--path")
            .arg(path.as_str())
            .env("APPDECK_STORE_DIR", self.root.join("store").as_str())
            .env_remove("APPDECK_PATH")
            .env_remove("APPDECK_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .unwrap();
        CliOutput::from(output)
    }
}

pub struct CliOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for CliOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl CliOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, self.stdout))
    }
}
