//! Template rendering for starter app configuration
//!
//! Uses Tera to generate the `shop.app.toml` written by `appdeck init`.

use crate::error::{Error, Result};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

const STARTER_CONFIG_TEMPLATE: &str = "shop.app.toml";

/// Context for rendering the starter `shop.app.toml`
#[derive(Debug, Clone, Serialize)]
pub struct StarterConfigContext {
    /// App name
    pub name: String,
    /// Template repository the project starts from, rendered inside a comment
    template_url: String,
    /// Comma separated access scopes
    pub scopes: String,
    pub extension_directories: Vec<String>,
    pub web_directories: Vec<String>,
}

impl StarterConfigContext {
    pub fn new(name: impl Into<String>, template_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_url: template_url.into().replace(['\n', '\r'], " "),
            scopes: String::new(),
            extension_directories: vec!["extensions/*".to_string()],
            web_directories: Vec::new(),
        }
    }

    pub fn with_web_directories(mut self, dirs: Vec<String>) -> Self {
        self.web_directories = dirs;
        self
    }

    fn to_tera_context(&self) -> Result<Context> {
        Context::from_serialize(self).map_err(|e| Error::Template(e.to_string()))
    }
}

/// Template registry for config file generation
pub struct ConfigTemplateRegistry {
    tera: Tera,
}

impl ConfigTemplateRegistry {
    /// Create a new template registry with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(STARTER_CONFIG_TEMPLATE, include_str!("shop.app.toml.tera"))
            .map_err(|e| Error::Template(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Render the starter configuration for a new project
    pub fn render_starter_config(&self, context: &StarterConfigContext) -> Result<String> {
        debug!("Rendering {} for {}", STARTER_CONFIG_TEMPLATE, context.name);
        self.tera
            .render(STARTER_CONFIG_TEMPLATE, &context.to_tera_context()?)
            .map_err(|e| Error::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfiguration;

    #[test]
    fn test_starter_config_is_a_legacy_document() {
        let registry = ConfigTemplateRegistry::new().unwrap();
        let context = StarterConfigContext::new("quick \"brave\" app", "https://example.com/template");
        let rendered = registry.render_starter_config(&context).unwrap();

        let config = AppConfiguration::parse(&rendered, "/new/shop.app.toml").unwrap();
        assert!(config.is_legacy());
        assert_eq!(config.name(), Some("quick \"brave\" app"));
        assert_eq!(
            config.extension_directories(),
            Some(&["extensions/*".to_string()][..])
        );
        assert_eq!(config.web_directories(), None);
        assert!(rendered.contains("# Template: https://example.com/template"));
    }

    #[test]
    fn test_starter_config_with_web_directories() {
        let registry = ConfigTemplateRegistry::new().unwrap();
        let context = StarterConfigContext::new("app", "https://example.com/t")
            .with_web_directories(vec!["web".to_string(), "web/frontend".to_string()]);
        let rendered = registry.render_starter_config(&context).unwrap();

        let config = AppConfiguration::parse(&rendered, "/new/shop.app.toml").unwrap();
        assert_eq!(
            config.web_directories().unwrap(),
            &["web".to_string(), "web/frontend".to_string()]
        );
    }

    #[test]
    fn test_template_url_stays_inside_the_comment() {
        let registry = ConfigTemplateRegistry::new().unwrap();
        let context = StarterConfigContext::new(
            "app",
            "https://x.example/t\nclient_id = 5\r\nembedded = true",
        );
        let rendered = registry.render_starter_config(&context).unwrap();

        let config = AppConfiguration::parse(&rendered, "/new/shop.app.toml").unwrap();
        assert!(config.is_legacy());
        assert_eq!(config.client_id(), None);
        assert!(rendered.lines().any(|line| line.starts_with("# Template: https://x.example/t ")));
    }
}
