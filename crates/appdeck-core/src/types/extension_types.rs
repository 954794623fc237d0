//! Extension instances and the specifications they are matched against

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Extension configuration file name
pub const EXTENSION_CONFIG_FILE: &str = "shop.extension.toml";

/// A loaded extension.
///
/// Instances are produced by discovery and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionInstance {
    /// Declared type, in either spelling of its specification
    #[serde(rename = "type")]
    pub extension_type: String,

    pub name: String,

    /// Stable identifier; defaults to the slugified name
    pub handle: String,

    /// Directory holding the extension configuration
    pub directory: Utf8PathBuf,

    /// Path of `shop.extension.toml`
    pub config_path: Utf8PathBuf,

    /// Renderer package the extension is built against, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,

    /// Full parsed configuration
    #[serde(default)]
    pub configuration: toml::Table,
}

impl ExtensionInstance {
    pub fn new(
        extension_type: impl Into<String>,
        name: impl Into<String>,
        directory: impl Into<Utf8PathBuf>,
    ) -> Self {
        let name = name.into();
        let directory = directory.into();
        Self {
            extension_type: extension_type.into(),
            handle: crate::utils::slugify(&name),
            config_path: directory.join(EXTENSION_CONFIG_FILE),
            name,
            directory,
            dependency: None,
            configuration: toml::Table::new(),
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    pub fn with_configuration(mut self, configuration: toml::Table) -> Self {
        self.configuration = configuration;
        self
    }
}

/// A kind of extension, known under two equivalent type spellings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSpecification {
    /// Internal identifier (e.g. `ui_extension`)
    pub identifier: String,

    /// Externally documented identifier (e.g. `checkout_ui_extension`)
    pub external_identifier: String,

    /// Human readable name used in reports
    pub external_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl ExtensionSpecification {
    pub fn new(
        identifier: impl Into<String>,
        external_identifier: impl Into<String>,
        external_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            external_identifier: external_identifier.into(),
            external_name: external_name.into(),
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Both accepted spellings
    pub fn aliases(&self) -> [&str; 2] {
        [&self.identifier, &self.external_identifier]
    }

    /// Whether `extension_type` is either spelling of this specification
    pub fn matches_type(&self, extension_type: &str) -> bool {
        self.aliases().contains(&extension_type)
    }
}
