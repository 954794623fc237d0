//! Error types for appdeck-core

use std::fmt;
use thiserror::Error;

/// Result type alias using appdeck-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// A single schema violation: the dotted field path and the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path to the offending field (e.g. `webhooks.api_version`)
    pub path: String,

    /// Human readable reason
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "  - {}", self.message)
        } else {
            write!(f, "  - {}: {}", self.path, self.message)
        }
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Core error types for appdeck
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration file name
    #[error("Invalid configuration name: {name}")]
    InvalidConfigName { name: String },

    /// Invalid configuration content that is not a schema violation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Document matches neither configuration schema
    #[error("Schema validation failed:\n{}", format_issues(.issues))]
    SchemaViolation { issues: Vec<FieldIssue> },

    /// Invalid web process configuration
    #[error("Invalid web configuration at {path}: {message}")]
    InvalidWebConfig { path: String, message: String },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Dotenv parsing error
    #[error("Failed to read environment file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    /// Glob pattern error
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config name error
    pub fn invalid_config_name(name: impl Into<String>) -> Self {
        Self::InvalidConfigName { name: name.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a schema violation error from the collected issues
    pub fn schema_violation(issues: Vec<FieldIssue>) -> Self {
        Self::SchemaViolation { issues }
    }

    /// Create an invalid web configuration error
    pub fn invalid_web_config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWebConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Field issues carried by a schema violation, empty for other errors
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::SchemaViolation { issues } => issues,
            _ => &[],
        }
    }
}
