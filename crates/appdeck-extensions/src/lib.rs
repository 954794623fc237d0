//! Extension handling for appdeck
//!
//! This crate handles:
//! - The extension specification registry and its alias table
//! - Discovery of `shop.extension.toml` files
//! - Flow template validation and deploy payloads
//! - Extension localization files

pub mod discovery;
pub mod flow_template;
pub mod locales;
pub mod specification;

pub use discovery::{discover_extensions, load_app_extensions, Discovery};
pub use flow_template::{deploy_config, FlowTemplateConfig, FlowTemplateDeployConfig};
pub use locales::{load_locales_config, LocalesConfig};
pub use specification::SpecificationRegistry;
