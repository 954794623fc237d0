//! Extension discovery
//!
//! Finds `shop.extension.toml` files below the app's extension directories
//! and turns them into [`ExtensionInstance`]s. Problems with a single
//! extension are recorded against its file and never abort the load.

use crate::flow_template::FlowTemplateConfig;
use crate::specification::{SpecificationRegistry, FLOW_TEMPLATE};
use anyhow::{anyhow, Context, Result};
use appdeck_core::types::{ExtensionInstance, EXTENSION_CONFIG_FILE};
use appdeck_core::{AppErrors, Application};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Searched when the configuration declares no extension directories
pub const DEFAULT_EXTENSION_DIRECTORIES: &[&str] = &["extensions/*"];

/// Extensions found on disk and the errors met while loading them
#[derive(Debug, Default)]
pub struct Discovery {
    pub extensions: Vec<ExtensionInstance>,
    pub errors: AppErrors,
}

/// Sorted list of extension configuration files below the directory globs
pub fn find_extension_configs(
    app_directory: &Utf8Path,
    extension_directories: Option<&[String]>,
) -> Result<Vec<Utf8PathBuf>> {
    let patterns: Vec<&str> = match extension_directories {
        Some(dirs) if !dirs.is_empty() => dirs.iter().map(String::as_str).collect(),
        _ => DEFAULT_EXTENSION_DIRECTORIES.to_vec(),
    };

    let base = glob::Pattern::escape(app_directory.as_str());
    let mut files = Vec::new();
    for pattern in patterns {
        let full = format!(
            "{}/{}/{}",
            base,
            pattern.trim_end_matches('/'),
            EXTENSION_CONFIG_FILE
        );
        for entry in glob::glob(&full).with_context(|| format!("Invalid extension directory {}", pattern))? {
            match entry {
                Ok(path) => match Utf8PathBuf::from_path_buf(path) {
                    Ok(path) if !path.components().any(|c| c.as_str() == "node_modules") => {
                        files.push(path)
                    }
                    Ok(_) => {}
                    Err(path) => warn!("Skipping non UTF-8 path {}", path.display()),
                },
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn required_string(table: &toml::Table, key: &str) -> Result<String> {
    match table.get(key) {
        Some(toml::Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(toml::Value::String(_)) | None => Err(anyhow!("Missing required field `{}`", key)),
        Some(other) => Err(anyhow!(
            "Field `{}` must be a string, found {}",
            key,
            other.type_str()
        )),
    }
}

fn optional_string(table: &toml::Table, key: &str) -> Result<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(anyhow!(
            "Field `{}` must be a string, found {}",
            key,
            other.type_str()
        )),
    }
}

/// Load a single extension configuration file
pub fn load_extension(config_path: &Utf8Path, registry: &SpecificationRegistry) -> Result<ExtensionInstance> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path))?;
    let table: toml::Table = content
        .parse()
        .with_context(|| format!("Failed to parse {}", config_path))?;

    let extension_type = required_string(&table, "type")?;
    let name = required_string(&table, "name")?;

    let identifier = registry
        .canonical_identifier(&extension_type)
        .ok_or_else(|| anyhow!("Unknown extension type `{}`", extension_type))?;

    let directory = config_path
        .parent()
        .map(Utf8Path::to_owned)
        .unwrap_or_default();

    let mut extension = ExtensionInstance::new(extension_type, name, directory);
    extension.config_path = config_path.to_owned();
    if let Some(handle) = optional_string(&table, "handle")? {
        extension = extension.with_handle(handle);
    }
    if let Some(dependency) = optional_string(&table, "dependency")? {
        extension = extension.with_dependency(dependency);
    }
    let extension = extension.with_configuration(table);

    if identifier == FLOW_TEMPLATE {
        FlowTemplateConfig::from_extension(&extension)?;
    }

    Ok(extension)
}

/// Discover every extension of an app.
///
/// Files are visited in sorted order, so discovery order is stable.
pub fn discover_extensions(
    app_directory: &Utf8Path,
    extension_directories: Option<&[String]>,
    registry: &SpecificationRegistry,
) -> Result<Discovery> {
    let mut discovery = Discovery::default();
    let mut handles = HashSet::new();

    for config_path in find_extension_configs(app_directory, extension_directories)? {
        match load_extension(&config_path, registry) {
            Ok(extension) => {
                if !handles.insert(extension.handle.clone()) {
                    discovery.errors.add_error(
                        config_path,
                        format!("Duplicated handle \"{}\" in extensions", extension.handle),
                    );
                    continue;
                }
                debug!(
                    "Loaded {} extension {} from {}",
                    extension.extension_type, extension.handle, extension.directory
                );
                discovery.extensions.push(extension);
            }
            Err(e) => {
                debug!("Failed to load {}: {:#}", config_path, e);
                discovery.errors.add_error(config_path, format!("{:#}", e));
            }
        }
    }

    Ok(discovery)
}

/// Discover the extensions of `app` and attach them along with their errors
pub fn load_app_extensions(app: Application, registry: &SpecificationRegistry) -> Result<Application> {
    let discovery = discover_extensions(
        &app.directory,
        app.configuration.extension_directories(),
        registry,
    )?;
    Ok(app.with_extensions(discovery.extensions, discovery.errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_string_rejects_blank_and_wrong_types() {
        let table: toml::Table = "name = \" \"\ntype = 3".parse().unwrap();
        assert!(required_string(&table, "name").is_err());
        assert!(required_string(&table, "type")
            .unwrap_err()
            .to_string()
            .contains("integer"));
        assert!(required_string(&table, "missing").is_err());
    }
}
