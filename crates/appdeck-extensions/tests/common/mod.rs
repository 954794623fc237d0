//! Common test utilities for appdeck-extensions
//!
//! Provides an on-disk app fixture that tests populate with extension
//! directories, configuration files and workflow assets.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// App directory living in a temporary directory
pub struct AppFixture {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl AppFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(root.join("shop.app.toml"), "scopes = \"\"\n").unwrap();
        Self { _temp: temp, root }
    }

    /// Write a file relative to the app root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write `<dir>/shop.extension.toml`
    pub fn extension(&self, dir: &str, content: &str) -> Utf8PathBuf {
        self.write(&format!("{}/shop.extension.toml", dir), content)
    }

    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Minimal extension configuration
pub fn extension_toml(extension_type: &str, name: &str) -> String {
    format!("type = \"{}\"\nname = \"{}\"\n", extension_type, name)
}

/// Flow template configuration pointing at `module`
pub fn flow_template_toml(name: &str, module: &str) -> String {
    format!(
        r#"type = "flow_template"
name = "{}"
description = "Tags new orders"

[template]
categories = ["orders", "risk"]
module = "{}"
require_app = false
discoverable = true
enabled = true
"#,
        name, module
    )
}
