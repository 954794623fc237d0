//! # appdeck-core
//!
//! Core library for the appdeck CLI providing:
//! - App configuration schemas and the legacy/current discriminator
//! - Access scope extraction
//! - Web process configuration and launchability
//! - The `Application` aggregate and its loader
//! - Node dependency lookup, `.env` reading and CI metadata
//! - App creation payloads and starter config templates

pub mod app;
pub mod ci;
pub mod config;
pub mod dependencies;
pub mod dotenv;
pub mod error;
pub mod payload;
pub mod templates;
pub mod types;
pub mod utils;

pub use app::{app_is_launchable, AppErrors, AppLoader, Application};
pub use config::{AppConfiguration, SchemaKind};
pub use error::{Error, FieldIssue, Result};
