//! The application aggregate assembled once per command invocation

mod loader;

pub use loader::{detect_framework, discover_webs, AppLoader, ID_ENVIRONMENT_VARIABLE};

use crate::config::{AppConfiguration, LegacyAppConfiguration};
use crate::dependencies::{get_dependencies, PackageManager};
use crate::dotenv::DotEnvFile;
use crate::error::Result;
use crate::types::{ExtensionInstance, ExtensionSpecification, Web, WebRole};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Load errors keyed by the file that caused them, in the order recorded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AppErrors {
    errors: IndexMap<Utf8PathBuf, String>,
}

impl AppErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; a later error for the same path replaces the earlier one
    pub fn add_error(&mut self, path: impl Into<Utf8PathBuf>, message: impl Into<String>) {
        self.errors.insert(path.into(), message.into());
    }

    pub fn get_error(&self, path: &Utf8Path) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &str)> {
        self.errors
            .iter()
            .map(|(path, message)| (path.as_path(), message.as_str()))
    }

    pub fn extend(&mut self, other: AppErrors) {
        self.errors.extend(other.errors);
    }
}

/// An app on disk: its classified configuration, web processes and extensions.
///
/// The only mutation after construction is [`Application::update_dependencies`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub name: String,

    /// Environment variable holding the app's client id
    pub id_environment_variable_name: String,

    pub directory: Utf8PathBuf,

    pub package_manager: PackageManager,

    pub configuration: AppConfiguration,

    /// Resolved node dependency versions by package name
    pub node_dependencies: BTreeMap<String, String>,

    pub webs: Vec<Web>,

    pub uses_workspaces: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<DotEnvFile>,

    /// Extensions in discovery order
    pub all_extensions: Vec<ExtensionInstance>,

    #[serde(skip_serializing_if = "AppErrors::is_empty")]
    pub errors: AppErrors,
}

impl Application {
    /// Placeholder app used before any configuration has been loaded
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            id_environment_variable_name: String::new(),
            directory: Utf8PathBuf::new(),
            package_manager: PackageManager::Npm,
            configuration: AppConfiguration::Legacy(LegacyAppConfiguration {
                scopes: String::new(),
                extension_directories: Some(Vec::new()),
                ..Default::default()
            }),
            node_dependencies: BTreeMap::new(),
            webs: Vec::new(),
            uses_workspaces: false,
            dotenv: None,
            all_extensions: Vec::new(),
            errors: AppErrors::new(),
        }
    }

    /// Attach discovered extensions and the errors met while loading them
    pub fn with_extensions(mut self, extensions: Vec<ExtensionInstance>, errors: AppErrors) -> Self {
        self.all_extensions = extensions;
        self.errors.extend(errors);
        self
    }

    pub fn has_extensions(&self) -> bool {
        !self.all_extensions.is_empty()
    }

    /// Extensions whose type is either spelling of `specification`, in
    /// discovery order
    pub fn extensions_for_type(&self, specification: &ExtensionSpecification) -> Vec<&ExtensionInstance> {
        self.all_extensions
            .iter()
            .filter(|extension| specification.matches_type(&extension.extension_type))
            .collect()
    }

    pub fn is_launchable(&self) -> bool {
        app_is_launchable(self)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Re-read `package.json` and replace the dependency map wholesale
    pub async fn update_dependencies(&mut self) -> Result<()> {
        let manifest = self.directory.join("package.json");
        self.node_dependencies = get_dependencies(&manifest).await?;
        debug!(
            "Refreshed {} node dependencies from {}",
            self.node_dependencies.len(),
            manifest
        );
        Ok(())
    }
}

/// An app is launchable when some web process serves a frontend or backend
pub fn app_is_launchable(app: &Application) -> bool {
    app.webs.iter().any(|web| {
        web.configuration.has_role(WebRole::Frontend) || web.configuration.has_role(WebRole::Backend)
    })
}
