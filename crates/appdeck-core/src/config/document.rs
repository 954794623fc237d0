//! Typed app configuration documents and the dialect discriminator

use crate::config::schema::{validate_table, APP_SCHEMA, LEGACY_APP_SCHEMA};
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;
use toml::{Table, Value};
use tracing::debug;

/// Key that callers may attach to a raw document to record its origin
const PATH_KEY: &str = "path";

/// Older, all-optional configuration shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyAppConfiguration {
    /// File the document was loaded from
    #[serde(skip)]
    pub path: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<LegacyClientId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Comma separated access scopes
    #[serde(default)]
    pub scopes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_directories: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_directories: Option<Vec<String>>,
}

/// Numeric client id of a legacy document, kept in the form it was written
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyClientId {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for LegacyClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyClientId::Integer(id) => write!(f, "{}", id),
            LegacyClientId::Float(id) if id.is_finite() && id.fract() == 0.0 => {
                write!(f, "{}", *id as i64)
            }
            LegacyClientId::Float(id) => write!(f, "{}", id),
        }
    }
}

/// Current, fully specified configuration shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrentAppConfiguration {
    /// File the document was loaded from
    #[serde(skip)]
    pub path: Utf8PathBuf,

    pub name: String,

    pub client_id: String,

    pub application_url: String,

    pub embedded: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_scopes: Option<AccessScopesConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    pub webhooks: WebhooksConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_proxy: Option<AppProxyConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<PosConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_preferences: Option<AppPreferencesConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_directories: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_directories: Option<Vec<String>>,
}

/// `[access_scopes]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessScopesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_install_flow: Option<bool>,
}

/// `[auth]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub redirect_urls: Vec<String>,
}

/// `[webhooks]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhooksConfig {
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_compliance: Option<PrivacyComplianceConfig>,
}

/// `[webhooks.privacy_compliance]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyComplianceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_deletion_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_data_request_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_deletion_url: Option<String>,
}

/// `[app_proxy]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppProxyConfig {
    pub url: String,
    pub subpath: String,
    pub prefix: String,
}

/// `[pos]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosConfig {
    pub embedded: bool,
}

/// `[app_preferences]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppPreferencesConfig {
    pub url: String,
}

/// `[build]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatically_update_urls_on_dev: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_store_url: Option<String>,
}

/// Which dialect a document was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Legacy,
    Current,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::Legacy => write!(f, "legacy"),
            SchemaKind::Current => write!(f, "current"),
        }
    }
}

/// A classified app configuration.
///
/// The variant is decided once, when the document is loaded, so consumers
/// match on the tag instead of re-validating the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppConfiguration {
    Legacy(LegacyAppConfiguration),
    Current(CurrentAppConfiguration),
}

fn without_path(table: &Table) -> Table {
    let mut rest = table.clone();
    rest.remove(PATH_KEY);
    rest
}

/// Whether a raw document is valid against the legacy schema.
///
/// An empty document is legacy: every legacy field is optional.
pub fn is_legacy_app_schema(table: &Table) -> bool {
    validate_table(&without_path(table), LEGACY_APP_SCHEMA).is_empty()
}

/// Whether a raw document is valid against the current schema
pub fn is_current_app_schema(table: &Table) -> bool {
    validate_table(&without_path(table), APP_SCHEMA).is_empty()
}

impl AppConfiguration {
    /// Classify a raw document loaded from `path`.
    ///
    /// The legacy schema is checked first. When neither schema accepts the
    /// document, the issues of the closer schema are returned.
    pub fn from_table(table: Table, path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path = path.into();
        let rest = without_path(&table);

        let legacy_issues = validate_table(&rest, LEGACY_APP_SCHEMA);
        if legacy_issues.is_empty() {
            debug!("Classified {} as legacy configuration", path);
            let mut config: LegacyAppConfiguration = Value::Table(rest).try_into()?;
            config.path = path;
            return Ok(AppConfiguration::Legacy(config));
        }

        let current_issues = validate_table(&rest, APP_SCHEMA);
        if current_issues.is_empty() {
            debug!("Classified {} as current configuration", path);
            let mut config: CurrentAppConfiguration = Value::Table(rest).try_into()?;
            config.path = path;
            return Ok(AppConfiguration::Current(config));
        }

        debug!(
            "{} matches neither schema ({} legacy issues, {} current issues)",
            path,
            legacy_issues.len(),
            current_issues.len()
        );
        let issues = if legacy_issues.len() < current_issues.len() {
            legacy_issues
        } else {
            current_issues
        };
        Err(Error::schema_violation(issues))
    }

    /// Parse TOML source and classify it
    pub fn parse(content: &str, path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let table: Table = content.parse()?;
        Self::from_table(table, path)
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            AppConfiguration::Legacy(_) => SchemaKind::Legacy,
            AppConfiguration::Current(_) => SchemaKind::Current,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, AppConfiguration::Legacy(_))
    }

    pub fn is_current(&self) -> bool {
        matches!(self, AppConfiguration::Current(_))
    }

    pub fn as_legacy(&self) -> Option<&LegacyAppConfiguration> {
        match self {
            AppConfiguration::Legacy(config) => Some(config),
            AppConfiguration::Current(_) => None,
        }
    }

    pub fn as_current(&self) -> Option<&CurrentAppConfiguration> {
        match self {
            AppConfiguration::Current(config) => Some(config),
            AppConfiguration::Legacy(_) => None,
        }
    }

    /// File the document was loaded from
    pub fn path(&self) -> &Utf8Path {
        match self {
            AppConfiguration::Legacy(config) => &config.path,
            AppConfiguration::Current(config) => &config.path,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AppConfiguration::Legacy(config) => config.name.as_deref(),
            AppConfiguration::Current(config) => Some(&config.name),
        }
    }

    /// Client id as a string; legacy numeric ids are rendered without a fraction
    pub fn client_id(&self) -> Option<String> {
        match self {
            AppConfiguration::Legacy(config) => config.client_id.map(|id| id.to_string()),
            AppConfiguration::Current(config) => Some(config.client_id.clone()),
        }
    }

    pub fn extension_directories(&self) -> Option<&[String]> {
        match self {
            AppConfiguration::Legacy(config) => config.extension_directories.as_deref(),
            AppConfiguration::Current(config) => config.extension_directories.as_deref(),
        }
    }

    pub fn web_directories(&self) -> Option<&[String]> {
        match self {
            AppConfiguration::Legacy(config) => config.web_directories.as_deref(),
            AppConfiguration::Current(config) => config.web_directories.as_deref(),
        }
    }

    /// Dev store declared in the `[build]` block
    pub fn dev_store_url(&self) -> Option<&str> {
        self.as_current()
            .and_then(|config| config.build.as_ref())
            .and_then(|build| build.dev_store_url.as_deref())
    }

    /// `build.automatically_update_urls_on_dev`, when declared
    pub fn update_urls_on_dev(&self) -> Option<bool> {
        self.as_current()
            .and_then(|config| config.build.as_ref())
            .and_then(|build| build.automatically_update_urls_on_dev)
    }

    /// Serialize back to TOML (the path is not part of the document)
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
