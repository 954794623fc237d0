//! Helpers shared across CLI commands

use crate::cli::AppTarget;
use anyhow::{anyhow, Context, Result};
use appdeck_core::config::{config_file_name, find_app_directory};
use appdeck_core::{AppLoader, Application};
use appdeck_extensions::{load_app_extensions, SpecificationRegistry};
use appdeck_store::{app_store, get_cached_app_info};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::IsTerminal;
use tracing::{debug, warn};

pub fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow!("Current directory is not UTF-8: {}", p.display()))
}

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// `--path` when given, otherwise the current directory
pub fn resolve_directory(path: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    match path {
        Some(path) => Ok(path.to_owned()),
        None => current_dir(),
    }
}

/// Configuration file to load for the app in `directory`.
///
/// An explicit `--config` wins, then the selection stored by
/// `app config use`, then the default file.
pub fn selected_config_name(directory: &Utf8Path, explicit: Option<&str>) -> Result<Option<String>> {
    if let Some(name) = explicit {
        return Ok(Some(config_file_name(Some(name))?));
    }

    let cached = match app_store().and_then(|store| get_cached_app_info(&store, directory)) {
        Ok(info) => info.and_then(|info| info.config_file),
        Err(e) => {
            warn!("Ignoring unreadable app cache: {:#}", e);
            None
        }
    };

    match cached {
        Some(file) if directory.join(&file).is_file() => {
            debug!("Using cached configuration {}", file);
            Ok(Some(file))
        }
        Some(file) => {
            warn!("Cached configuration {} no longer exists, using the default", file);
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Load the app selected by the global flags, extensions included
pub async fn load_app(target: &AppTarget) -> Result<Application> {
    let start = resolve_directory(target.path.as_deref())?;
    let directory = find_app_directory(&start)?;
    let config_name = selected_config_name(&directory, target.config.as_deref())?;

    let app = AppLoader::new(&directory)
        .with_config_name(config_name)
        .load()
        .await
        .with_context(|| format!("Failed to load the app in {}", directory))?;

    load_app_extensions(app, &SpecificationRegistry::builtin())
}
