//! Node package manifest reading and dependency version lookup

use crate::error::{Error, Result};
use crate::types::ExtensionInstance;
use crate::utils::find_path_up;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Package manager driving the app's node tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Yarn => write!(f, "yarn"),
            PackageManager::Pnpm => write!(f, "pnpm"),
            PackageManager::Bun => write!(f, "bun"),
        }
    }
}

impl PackageManager {
    /// Detect from the lock file present in `directory`, defaulting to npm
    pub fn detect(directory: &Utf8Path) -> Self {
        const LOCKFILES: [(&str, PackageManager); 3] = [
            ("yarn.lock", PackageManager::Yarn),
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("bun.lockb", PackageManager::Bun),
        ];

        LOCKFILES
            .iter()
            .find(|(lockfile, _)| directory.join(lockfile).is_file())
            .map(|(_, manager)| *manager)
            .unwrap_or_default()
    }
}

/// The subset of `package.json` the CLI reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub workspaces: Option<serde_json::Value>,
}

/// Read and parse a `package.json` file
pub async fn read_package_json(path: &Utf8Path) -> Result<PackageJson> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Dependencies and dev dependencies of a manifest, dev entries winning
pub async fn get_dependencies(package_json: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let manifest = read_package_json(package_json).await?;
    let mut dependencies = manifest.dependencies;
    dependencies.extend(manifest.dev_dependencies);
    Ok(dependencies)
}

/// Whether the app is a node workspace root
pub async fn uses_workspaces(directory: &Utf8Path) -> Result<bool> {
    if directory.join("pnpm-workspace.yaml").is_file() {
        return Ok(true);
    }
    let package_json = directory.join("package.json");
    if !package_json.is_file() {
        return Ok(false);
    }
    Ok(read_package_json(&package_json).await?.workspaces.is_some())
}

/// Outcome of a dependency version lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyVersion {
    Found { name: String, version: String },
    NotFound,
}

impl DependencyVersion {
    pub fn version(&self) -> Option<&str> {
        match self {
            DependencyVersion::Found { version, .. } => Some(version),
            DependencyVersion::NotFound => None,
        }
    }
}

fn manifest_pattern(dependency: &str) -> Utf8PathBuf {
    // The react flavour depends on the vanilla package, which is always installed
    let base = dependency.replace("-react", "");
    let mut path = Utf8PathBuf::from("node_modules");
    for segment in base.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push("package.json");
    path
}

/// Find the installed version of `dependency`, searching `node_modules`
/// from `directory` upwards.
///
/// A missing manifest or a manifest without a version is not an error.
pub async fn get_dependency_version(
    dependency: &str,
    directory: &Utf8Path,
) -> Result<DependencyVersion> {
    let pattern = manifest_pattern(dependency);

    let Some(found) = find_path_up(directory, &pattern) else {
        debug!("No {} found above {}", pattern, directory);
        return Ok(DependencyVersion::NotFound);
    };
    let real = tokio::fs::canonicalize(&found).await?;
    let real = Utf8PathBuf::from_path_buf(real).unwrap_or(found);

    match read_package_json(&real).await?.version {
        Some(version) => Ok(DependencyVersion::Found {
            name: dependency.to_string(),
            version,
        }),
        None => Ok(DependencyVersion::NotFound),
    }
}

/// Version of the renderer package a UI extension is built against.
///
/// `None` when the extension declares no renderer dependency.
pub async fn ui_extension_renderer_version(
    extension: &ExtensionInstance,
) -> Result<Option<DependencyVersion>> {
    match extension.dependency.as_deref() {
        Some(dependency) => Ok(Some(
            get_dependency_version(dependency, &extension.directory).await?,
        )),
        None => Ok(None),
    }
}
