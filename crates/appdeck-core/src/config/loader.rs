//! App configuration file discovery and loading

use super::document::AppConfiguration;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Prefix shared by every app configuration file
pub const CONFIG_FILE_PREFIX: &str = "shop.app";

/// Default app configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "shop.app.toml";

const CONFIG_FILE_EXTENSION: &str = ".toml";

/// Resolve a user supplied configuration name to a file name.
///
/// `None` selects the default file. Names may be given in full
/// (`shop.app.staging.toml`) or bare (`staging`).
pub fn config_file_name(name: Option<&str>) -> Result<String> {
    let Some(name) = name.map(str::trim) else {
        return Ok(DEFAULT_CONFIG_FILE.to_string());
    };

    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(Error::invalid_config_name(name));
    }

    if is_config_file_name(name) {
        return Ok(name.to_string());
    }

    if name.ends_with(CONFIG_FILE_EXTENSION) || name.starts_with('.') || name.ends_with('.') {
        return Err(Error::invalid_config_name(name));
    }

    Ok(format!(
        "{}.{}{}",
        CONFIG_FILE_PREFIX, name, CONFIG_FILE_EXTENSION
    ))
}

/// Whether a file name looks like an app configuration file
pub fn is_config_file_name(file_name: &str) -> bool {
    file_name == DEFAULT_CONFIG_FILE
        || (file_name.starts_with(&format!("{}.", CONFIG_FILE_PREFIX))
            && file_name.ends_with(CONFIG_FILE_EXTENSION)
            && file_name.len() > DEFAULT_CONFIG_FILE.len())
}

/// List app configuration files in a directory, sorted by name
pub fn available_config_files(directory: &Utf8Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_config_file_name(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Walk up from `start` to the first directory holding an app configuration
pub fn find_app_directory(start: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut current = start;

    loop {
        if current.join(DEFAULT_CONFIG_FILE).is_file()
            || available_config_files(current).is_ok_and(|files| !files.is_empty())
        {
            debug!("Found app configuration in {}", current);
            return Ok(current.to_owned());
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    Err(Error::config_not_found(format!(
        "{} (searched {} and parent directories)",
        DEFAULT_CONFIG_FILE, start
    )))
}

/// Read and classify the configuration named `name` inside `directory`
pub fn load_app_configuration(
    directory: &Utf8Path,
    name: Option<&str>,
) -> Result<AppConfiguration> {
    let file_name = config_file_name(name)?;
    let path = directory.join(&file_name);

    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;

    debug!("Loaded app configuration from {}", path);
    AppConfiguration::parse(&content, path)
}
