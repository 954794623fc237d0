//! Request variables for creating an app on the platform

use crate::app::Application;
use crate::config::{app_scopes_array, uses_legacy_scopes_behavior, AppConfiguration};
use serde::Serialize;

/// Application URL used until the app declares its own
pub const DEFAULT_APP_URL: &str = "https://example.com";

/// Redirect URL used until the app declares its own
pub const DEFAULT_REDIRECT_URL: &str = "https://example.com/api/auth";

/// Kind of app being created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    #[default]
    Public,
    Custom,
    Undecided,
}

impl std::str::FromStr for AppType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(AppType::Public),
            "custom" => Ok(AppType::Custom),
            "undecided" => Ok(AppType::Undecided),
            other => Err(format!(
                "unknown app type '{}' (expected public, custom or undecided)",
                other
            )),
        }
    }
}

/// Variables of the app creation mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppVariables {
    pub org: u64,
    pub title: String,
    pub app_url: String,
    pub redir: Vec<String>,
    #[serde(rename = "type")]
    pub app_type: AppType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_access_scopes: Option<Vec<String>>,
}

impl CreateAppVariables {
    pub fn from_app(org: u64, app: &Application, app_type: AppType) -> Self {
        let (app_url, redir) = match &app.configuration {
            AppConfiguration::Current(current) => (
                current.application_url.clone(),
                current
                    .auth
                    .as_ref()
                    .map(|auth| auth.redirect_urls.clone())
                    .unwrap_or_else(|| vec![DEFAULT_REDIRECT_URL.to_string()]),
            ),
            AppConfiguration::Legacy(_) => (
                DEFAULT_APP_URL.to_string(),
                vec![DEFAULT_REDIRECT_URL.to_string()],
            ),
        };

        let requested_access_scopes = if uses_legacy_scopes_behavior(&app.configuration) {
            None
        } else {
            Some(app_scopes_array(&app.configuration))
        };

        Self {
            org,
            title: app.name.clone(),
            app_url,
            redir,
            app_type,
            requested_access_scopes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(source: &str) -> Application {
        Application {
            name: "my app".to_string(),
            configuration: AppConfiguration::parse(source, "/app/shop.app.toml").unwrap(),
            ..Application::empty()
        }
    }

    #[test]
    fn test_legacy_app_uses_defaults_and_omits_scopes() {
        let vars = CreateAppVariables::from_app(1, &app("scopes = \"read_products\""), AppType::Public);
        assert_eq!(vars.app_url, DEFAULT_APP_URL);
        assert_eq!(vars.redir, vec![DEFAULT_REDIRECT_URL]);
        assert_eq!(vars.requested_access_scopes, None);

        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["appUrl"], "https://example.com");
        assert_eq!(json["type"], "public");
        assert!(json.get("requestedAccessScopes").is_none());
    }

    #[test]
    fn test_current_app_carries_urls_and_scopes() {
        let vars = CreateAppVariables::from_app(
            42,
            &app(
                r#"
name = "my app"
client_id = "12345"
application_url = "https://my-app.example.com"
embedded = true

[access_scopes]
scopes = "read_products, write_orders"

[auth]
redirect_urls = ["https://my-app.example.com/auth/callback"]

[webhooks]
api_version = "2023-07"
"#,
            ),
            AppType::Custom,
        );

        assert_eq!(vars.org, 42);
        assert_eq!(vars.title, "my app");
        assert_eq!(vars.app_url, "https://my-app.example.com");
        assert_eq!(vars.redir, vec!["https://my-app.example.com/auth/callback"]);
        assert_eq!(
            vars.requested_access_scopes,
            Some(vec!["read_products".to_string(), "write_orders".to_string()])
        );

        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["requestedAccessScopes"][1], "write_orders");
    }

    #[test]
    fn test_parse_app_type() {
        assert_eq!("Custom".parse::<AppType>().unwrap(), AppType::Custom);
        assert!("private".parse::<AppType>().is_err());
    }
}
