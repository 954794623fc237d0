//! Extension specification registry
//!
//! Every specification is reachable under both of its spellings through a
//! single alias table, so callers never compare type strings themselves.

use appdeck_core::types::ExtensionSpecification;
use std::collections::HashMap;
use tracing::debug;

/// Identifier of the flow template specification
pub const FLOW_TEMPLATE: &str = "flow_template";

/// Known extension specifications and their aliases
#[derive(Debug, Clone)]
pub struct SpecificationRegistry {
    specifications: Vec<ExtensionSpecification>,

    /// alias -> index into `specifications`
    aliases: HashMap<String, usize>,
}

impl SpecificationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            specifications: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Registry holding the built-in specifications
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in [
            ExtensionSpecification::new("ui_extension", "checkout_ui_extension", "Checkout UI")
                .with_features(&["ui_preview", "bundling", "esbuild"]),
            ExtensionSpecification::new("theme", "theme_app_extension", "Theme app extension")
                .with_features(&["theme"]),
            ExtensionSpecification::new("function", "function", "Function")
                .with_features(&["function"]),
            ExtensionSpecification::new("web_pixel_extension", "web_pixel_extension", "Web pixel")
                .with_features(&["bundling", "esbuild"]),
            ExtensionSpecification::new(FLOW_TEMPLATE, FLOW_TEMPLATE, "Flow template")
                .with_features(&["bundling"]),
        ] {
            registry.register(spec);
        }
        registry
    }

    /// Add a specification; aliases already taken keep their first owner
    pub fn register(&mut self, specification: ExtensionSpecification) {
        let index = self.specifications.len();
        for alias in specification.aliases() {
            if self.aliases.contains_key(alias) {
                debug!("Alias {} is already registered, ignoring", alias);
                continue;
            }
            self.aliases.insert(alias.to_string(), index);
        }
        self.specifications.push(specification);
    }

    /// Specification known under `extension_type`
    pub fn find(&self, extension_type: &str) -> Option<&ExtensionSpecification> {
        self.aliases
            .get(extension_type)
            .map(|&index| &self.specifications[index])
    }

    /// Internal identifier for either spelling of a type
    pub fn canonical_identifier(&self, extension_type: &str) -> Option<&str> {
        self.find(extension_type).map(|spec| spec.identifier.as_str())
    }

    /// Whether `extension_type` resolves to `specification`
    pub fn matches(&self, specification: &ExtensionSpecification, extension_type: &str) -> bool {
        self.canonical_identifier(extension_type) == Some(specification.identifier.as_str())
    }

    /// All specifications in registration order
    pub fn all(&self) -> &[ExtensionSpecification] {
        &self.specifications
    }
}

impl Default for SpecificationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
