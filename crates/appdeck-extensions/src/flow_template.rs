//! `flow_template` extensions and their deploy payload

use crate::locales::{load_locales_config, LocalesConfig};
use anyhow::{anyhow, Context, Result};
use appdeck_core::types::ExtensionInstance;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `[template]` block of a flow template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowTemplateSettings {
    pub categories: Vec<String>,
    /// Workflow file, a glob relative to the extension directory
    pub module: String,
    pub require_app: bool,
    pub discoverable: bool,
    pub enabled: bool,
}

/// Flow template extension configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlowTemplateConfig {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub template: FlowTemplateSettings,
}

impl FlowTemplateConfig {
    /// Validate the configuration of a loaded extension
    pub fn from_extension(extension: &ExtensionInstance) -> Result<Self> {
        toml::Value::Table(extension.configuration.clone())
            .try_into()
            .map_err(|e| anyhow!("Invalid flow template configuration: {}", e))
    }
}

/// Payload sent when deploying a flow template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowTemplateDeployConfig {
    pub template_handle: String,
    pub handle: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub require_app: bool,
    pub discoverable: bool,
    pub enabled: bool,
    /// Workflow file contents, base64 encoded
    pub definition: String,
    pub localization: LocalesConfig,
}

async fn load_workflow(directory: &Utf8Path, module: &str) -> Result<String> {
    let path = directory.join(module);
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(directory.as_str()),
        module
    );

    let mut matches: Vec<Utf8PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid workflow path {}", module))?
        .filter_map(|entry| entry.ok())
        .filter_map(|p| Utf8PathBuf::from_path_buf(p).ok())
        .collect();
    matches.sort();

    let Some(file) = matches.into_iter().next() else {
        return Err(anyhow!("Missing flow file with the path {}", path));
    };

    debug!("Reading flow workflow from {}", file);
    let content = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file))?;
    Ok(STANDARD.encode(content))
}

/// Build the deploy payload of a flow template extension
pub async fn deploy_config(extension: &ExtensionInstance) -> Result<FlowTemplateDeployConfig> {
    let config = FlowTemplateConfig::from_extension(extension)?;
    let definition = load_workflow(&extension.directory, &config.template.module).await?;
    let localization = load_locales_config(&extension.directory, &config.name).await?;

    Ok(FlowTemplateDeployConfig {
        template_handle: extension.handle.clone(),
        handle: extension.handle.clone(),
        name: config.name,
        description: config.description,
        categories: config.template.categories,
        require_app: config.template.require_app,
        discoverable: config.template.discoverable,
        enabled: config.template.enabled,
        definition,
        localization,
    })
}
