//! JSON file backed key-value storage
//!
//! Each project is one JSON object on disk. Reads take a shared lock and
//! writes an exclusive one, so concurrent CLI invocations never interleave
//! partial writes.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::debug;

/// Overrides the store directory (used by tests and sandboxes)
pub const STORE_DIR_ENV: &str = "APPDECK_STORE_DIR";

/// Directory holding every store file
pub fn store_directory() -> Result<Utf8PathBuf> {
    if let Ok(dir) = std::env::var(STORE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(Utf8PathBuf::from(dir));
        }
    }

    let dirs = directories::ProjectDirs::from("", "", "appdeck")
        .context("Could not determine the appdeck configuration directory")?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf())
        .map_err(|p| anyhow::anyhow!("Configuration directory is not UTF-8: {}", p.display()))
}

fn read_object(file: &mut File) -> Result<Map<String, Value>> {
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// A project's key-value store, persisted at `<dir>/<project>.json`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: Utf8PathBuf,
}

impl LocalStorage {
    /// Open the store of `project` in the default store directory
    pub fn open(project: &str) -> Result<Self> {
        Ok(Self::in_directory(&store_directory()?, project))
    }

    /// Store of `project` inside `directory`
    pub fn in_directory(directory: &Utf8Path, project: &str) -> Self {
        Self {
            path: directory.join(format!("{}.json", project)),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e).with_context(|| format!("Failed to open {}", self.path)),
        };
        file.lock_shared()
            .context("Failed to acquire shared lock on store")?;
        read_object(&mut file).with_context(|| format!("Failed to read {}", self.path))
    }

    /// Apply `change` to the stored object under an exclusive lock
    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {}", parent))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path))?;

        // Released when `file` is dropped
        file.lock_exclusive()
            .context("Failed to acquire exclusive lock on store")?;

        let mut object = read_object(&mut file)?;
        change(&mut object);

        let content = serde_json::to_string_pretty(&Value::Object(object))?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(content.as_bytes())?;
        file.sync_all().context("Failed to sync store file")?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_all()?.remove(key) {
            Some(value) => Ok(Some(
                serde_json::from_value(value)
                    .with_context(|| format!("Stored value for {} has an unexpected shape", key))?,
            )),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        debug!("Setting {} in {}", key, self.path);
        self.update(|object| {
            object.insert(key.to_string(), value);
        })
    }

    /// Insert `entry` into the object stored at `key`, re-reading it under
    /// the write lock so entries added by other processes are kept
    pub fn merge_entry<T: Serialize>(&self, key: &str, entry: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        debug!("Merging {}.{} into {}", key, entry, self.path);
        self.update(|object| {
            let slot = object
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(inner) = slot {
                inner.insert(entry.to_string(), value);
            }
        })
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting {} from {}", key, self.path);
        self.update(|object| {
            object.remove(key);
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.update(Map::clear)
    }
}
