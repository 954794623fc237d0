//! Web process configuration (`shop.web.toml`)

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Web configuration file name
pub const WEB_CONFIG_FILE: &str = "shop.web.toml";

/// Role a web process plays for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebRole {
    #[default]
    Frontend,
    Backend,
    Background,
}

impl std::fmt::Display for WebRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebRole::Frontend => write!(f, "frontend"),
            WebRole::Backend => write!(f, "backend"),
            WebRole::Background => write!(f, "background"),
        }
    }
}

impl WebRole {
    /// Frontend and backend processes can be served directly
    pub fn is_launchable(&self) -> bool {
        matches!(self, WebRole::Frontend | WebRole::Backend)
    }
}

/// One or more OAuth callback paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthCallbackPath {
    Single(String),
    Multiple(Vec<String>),
}

impl AuthCallbackPath {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            AuthCallbackPath::Single(path) => vec![path.as_str()],
            AuthCallbackPath::Multiple(paths) => paths.iter().map(String::as_str).collect(),
        }
    }

    fn with_leading_slashes(self) -> Self {
        match self {
            AuthCallbackPath::Single(path) => AuthCallbackPath::Single(ensure_leading_slash(path)),
            AuthCallbackPath::Multiple(paths) => {
                AuthCallbackPath::Multiple(paths.into_iter().map(ensure_leading_slash).collect())
            }
        }
    }
}

/// `[commands]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebCommands {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,

    pub dev: String,
}

/// `[hmr_server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HmrServer {
    pub http_paths: Vec<String>,
}

/// Web configuration as written in `shop.web.toml`.
///
/// Roles may be declared as a `roles` list or a single `type`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebConfiguration {
    #[serde(default)]
    pub roles: Option<Vec<WebRole>>,

    #[serde(default, rename = "type")]
    pub web_type: Option<WebRole>,

    #[serde(default)]
    pub auth_callback_path: Option<AuthCallbackPath>,

    #[serde(default)]
    pub webhooks_path: Option<String>,

    #[serde(default)]
    pub port: Option<u32>,

    pub commands: WebCommands,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub hmr_server: Option<HmrServer>,
}

/// Web configuration with roles normalised to a list and paths prefixed with `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedWebConfiguration {
    pub roles: Vec<WebRole>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_callback_path: Option<AuthCallbackPath>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhooks_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    pub commands: WebCommands,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmr_server: Option<HmrServer>,
}

fn ensure_leading_slash(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

impl WebConfiguration {
    /// Parse `shop.web.toml` content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Normalise into the processed form.
    ///
    /// `origin` is the file the configuration came from and is only used
    /// for error reporting.
    pub fn process(self, origin: &Utf8Path) -> Result<ProcessedWebConfiguration> {
        let roles = match (self.roles, self.web_type) {
            (Some(_), Some(_)) => {
                return Err(Error::invalid_web_config(
                    origin.as_str(),
                    "declare either `roles` or `type`, not both",
                ))
            }
            (Some(roles), None) => roles,
            (None, Some(web_type)) => vec![web_type],
            (None, None) => vec![WebRole::default()],
        };

        let port = match self.port {
            Some(port) => Some(u16::try_from(port).map_err(|_| {
                Error::invalid_web_config(
                    origin.as_str(),
                    format!("port {} is outside 0..=65535", port),
                )
            })?),
            None => None,
        };

        Ok(ProcessedWebConfiguration {
            roles,
            auth_callback_path: self
                .auth_callback_path
                .map(AuthCallbackPath::with_leading_slashes),
            webhooks_path: self.webhooks_path.map(ensure_leading_slash),
            port,
            commands: self.commands,
            name: self.name,
            hmr_server: self.hmr_server,
        })
    }

    /// Read, parse and process a web configuration file
    pub fn load(path: &Utf8Path) -> Result<ProcessedWebConfiguration> {
        let content = std::fs::read_to_string(path)?;
        let raw = Self::parse(&content)
            .map_err(|e| Error::invalid_web_config(path.as_str(), e.to_string()))?;
        raw.process(path)
    }
}

impl ProcessedWebConfiguration {
    /// Role membership test; a process may hold several roles
    pub fn has_role(&self, role: WebRole) -> bool {
        self.roles.contains(&role)
    }
}

/// A web process of the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Web {
    /// Directory holding `shop.web.toml`
    pub directory: Utf8PathBuf,

    pub configuration: ProcessedWebConfiguration,

    /// Detected framework (e.g. `remix`)
    pub framework: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(source: &str) -> Result<ProcessedWebConfiguration> {
        WebConfiguration::parse(source)?.process(Utf8Path::new("/app/web/shop.web.toml"))
    }

    #[test]
    fn test_roles_default_to_frontend() {
        let web = process("[commands]\ndev = \"npm run dev\"").unwrap();
        assert_eq!(web.roles, vec![WebRole::Frontend]);
    }

    #[test]
    fn test_singular_type_becomes_roles_list() {
        let web = process("type = \"backend\"\n[commands]\ndev = \"npm run dev\"").unwrap();
        assert_eq!(web.roles, vec![WebRole::Backend]);
        assert!(web.has_role(WebRole::Backend));
        assert!(!web.has_role(WebRole::Frontend));
    }

    #[test]
    fn test_roles_list_is_kept() {
        let web = process(
            "roles = [\"frontend\", \"background\"]\n[commands]\ndev = \"npm run dev\"",
        )
        .unwrap();
        assert!(web.has_role(WebRole::Frontend));
        assert!(web.has_role(WebRole::Background));
    }

    #[test]
    fn test_roles_and_type_are_mutually_exclusive() {
        let err = process(
            "roles = [\"frontend\"]\ntype = \"backend\"\n[commands]\ndev = \"npm run dev\"",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidWebConfig { .. }));
    }

    #[test]
    fn test_paths_gain_a_leading_slash() {
        let web = process(
            r#"
auth_callback_path = ["auth/callback", "/auth/other"]
webhooks_path = "api/webhooks"

[commands]
dev = "npm run dev"
"#,
        )
        .unwrap();

        assert_eq!(
            web.auth_callback_path.unwrap().paths(),
            vec!["/auth/callback", "/auth/other"]
        );
        assert_eq!(web.webhooks_path.as_deref(), Some("/api/webhooks"));
    }

    #[test]
    fn test_single_auth_callback_path() {
        let web = process("auth_callback_path = \"cb\"\n[commands]\ndev = \"x\"").unwrap();
        assert_eq!(
            web.auth_callback_path,
            Some(AuthCallbackPath::Single("/cb".to_string()))
        );
    }

    #[test]
    fn test_port_bounds() {
        assert_eq!(
            process("port = 65535\n[commands]\ndev = \"x\"").unwrap().port,
            Some(65535)
        );
        assert_eq!(process("port = 0\n[commands]\ndev = \"x\"").unwrap().port, Some(0));
        assert!(process("port = 65536\n[commands]\ndev = \"x\"").is_err());
    }

    #[test]
    fn test_dev_command_is_required() {
        assert!(process("[commands]\nbuild = \"npm run build\"").is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(process("unknown = 1\n[commands]\ndev = \"x\"").is_err());
    }
}
