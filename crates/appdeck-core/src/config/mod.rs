//! App configuration: schema tables, dialect classification, scopes and loading

mod document;
mod loader;
pub mod schema;
mod scopes;

pub use document::{
    is_current_app_schema, is_legacy_app_schema, AccessScopesConfig, AppConfiguration,
    AppPreferencesConfig, AppProxyConfig, AuthConfig, BuildConfig, CurrentAppConfiguration,
    LegacyAppConfiguration, LegacyClientId, PosConfig, PrivacyComplianceConfig, SchemaKind,
    WebhooksConfig,
};
pub use loader::{
    available_config_files, config_file_name, find_app_directory, is_config_file_name,
    load_app_configuration, CONFIG_FILE_PREFIX, DEFAULT_CONFIG_FILE,
};
pub use schema::{is_valid_url, validate_table, validate_url, FieldKind, FieldRule};
pub use scopes::{
    app_scopes, app_scopes_array, normalize_scopes, split_scopes, uses_legacy_scopes_behavior,
};
