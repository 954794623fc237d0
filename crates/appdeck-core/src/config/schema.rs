//! Declarative rule tables for the two app configuration dialects
//!
//! Each dialect is a static table of [`FieldRule`]s. A single routine,
//! [`validate_table`], walks a table against a raw TOML document and reports
//! every violation it finds rather than stopping at the first one. Validation
//! is strict: keys that the table does not declare are violations too.

use crate::error::FieldIssue;
use toml::{Table, Value};

/// Maximum length of an app name in the current schema
pub const MAX_APP_NAME_LENGTH: usize = 30;

/// Maximum length of the app preferences URL
pub const MAX_PREFERENCES_URL_LENGTH: usize = 255;

const INVALID_URL: &str = "Invalid url";
const UNRECOGNIZED_KEY: &str = "Unrecognized key";
const REQUIRED: &str = "Required";

/// Shape of a single field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Any string, optionally bounded in characters
    String { max_len: Option<usize> },
    /// An `http(s)` URL without embedded newlines
    Url { max_len: Option<usize> },
    Boolean,
    /// Integer or float
    Number,
    StringArray,
    UrlArray,
    /// Nested table validated with its own rules
    Table(&'static [FieldRule]),
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::String { .. } | FieldKind::Url { .. } => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::StringArray | FieldKind::UrlArray => "array",
            FieldKind::Table(_) => "object",
        }
    }
}

/// Validation rule for one key of a table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(key: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        key,
        kind,
        required: true,
    }
}

const fn optional(key: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        key,
        kind,
        required: false,
    }
}

const STRING: FieldKind = FieldKind::String { max_len: None };
const URL: FieldKind = FieldKind::Url { max_len: None };

/// Legacy dialect: every field optional
pub const LEGACY_APP_SCHEMA: &[FieldRule] = &[
    optional("client_id", FieldKind::Number),
    optional("name", STRING),
    optional("scopes", STRING),
    optional("extension_directories", FieldKind::StringArray),
    optional("web_directories", FieldKind::StringArray),
];

const ACCESS_SCOPES_SCHEMA: &[FieldRule] = &[
    optional("scopes", STRING),
    optional("use_legacy_install_flow", FieldKind::Boolean),
];

const AUTH_SCHEMA: &[FieldRule] = &[required("redirect_urls", FieldKind::UrlArray)];

const PRIVACY_COMPLIANCE_SCHEMA: &[FieldRule] = &[
    optional("customer_deletion_url", URL),
    optional("customer_data_request_url", URL),
    optional("shop_deletion_url", URL),
];

const WEBHOOKS_SCHEMA: &[FieldRule] = &[
    required("api_version", STRING),
    optional(
        "privacy_compliance",
        FieldKind::Table(PRIVACY_COMPLIANCE_SCHEMA),
    ),
];

const APP_PROXY_SCHEMA: &[FieldRule] = &[
    required("url", URL),
    required("subpath", STRING),
    required("prefix", STRING),
];

const POS_SCHEMA: &[FieldRule] = &[required("embedded", FieldKind::Boolean)];

const APP_PREFERENCES_SCHEMA: &[FieldRule] = &[required(
    "url",
    FieldKind::Url {
        max_len: Some(MAX_PREFERENCES_URL_LENGTH),
    },
)];

const BUILD_SCHEMA: &[FieldRule] = &[
    optional("automatically_update_urls_on_dev", FieldKind::Boolean),
    optional("dev_store_url", STRING),
];

/// Current dialect
pub const APP_SCHEMA: &[FieldRule] = &[
    required(
        "name",
        FieldKind::String {
            max_len: Some(MAX_APP_NAME_LENGTH),
        },
    ),
    required("client_id", STRING),
    required("application_url", URL),
    required("embedded", FieldKind::Boolean),
    optional("access_scopes", FieldKind::Table(ACCESS_SCOPES_SCHEMA)),
    optional("auth", FieldKind::Table(AUTH_SCHEMA)),
    required("webhooks", FieldKind::Table(WEBHOOKS_SCHEMA)),
    optional("app_proxy", FieldKind::Table(APP_PROXY_SCHEMA)),
    optional("pos", FieldKind::Table(POS_SCHEMA)),
    optional("app_preferences", FieldKind::Table(APP_PREFERENCES_SCHEMA)),
    optional("build", FieldKind::Table(BUILD_SCHEMA)),
    optional("extension_directories", FieldKind::StringArray),
    optional("web_directories", FieldKind::StringArray),
];

/// Check a configuration URL.
///
/// The value must parse as an absolute URL, use the `http` or `https` scheme
/// and must not contain a line break.
pub fn validate_url(value: &str) -> std::result::Result<(), &'static str> {
    if url::Url::parse(value).is_err() {
        return Err(INVALID_URL);
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(INVALID_URL);
    }
    if value.contains(['\n', '\r']) {
        return Err(INVALID_URL);
    }
    Ok(())
}

/// Convenience wrapper around [`validate_url`]
pub fn is_valid_url(value: &str) -> bool {
    validate_url(value).is_ok()
}

/// Validate a raw document against a rule table, collecting every issue
pub fn validate_table(table: &Table, rules: &[FieldRule]) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    check_table(table, rules, "", &mut issues);
    issues
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn check_table(table: &Table, rules: &[FieldRule], prefix: &str, issues: &mut Vec<FieldIssue>) {
    for rule in rules {
        let path = join_path(prefix, rule.key);
        match table.get(rule.key) {
            Some(value) => check_value(value, rule.kind, &path, issues),
            None if rule.required => issues.push(FieldIssue::new(path, REQUIRED)),
            None => {}
        }
    }

    for key in table.keys() {
        if !rules.iter().any(|rule| rule.key == key) {
            issues.push(FieldIssue::new(join_path(prefix, key), UNRECOGNIZED_KEY));
        }
    }
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> FieldIssue {
    FieldIssue::new(
        path,
        format!("Expected {}, received {}", expected, value.type_str()),
    )
}

fn check_string(value: &str, max_len: Option<usize>, path: &str, issues: &mut Vec<FieldIssue>) {
    if let Some(max) = max_len {
        if value.chars().count() > max {
            issues.push(FieldIssue::new(
                path,
                format!("String must contain at most {} character(s)", max),
            ));
        }
    }
}

fn check_url(value: &str, max_len: Option<usize>, path: &str, issues: &mut Vec<FieldIssue>) {
    check_string(value, max_len, path, issues);
    if let Err(message) = validate_url(value) {
        issues.push(FieldIssue::new(path, message));
    }
}

fn check_value(value: &Value, kind: FieldKind, path: &str, issues: &mut Vec<FieldIssue>) {
    match kind {
        FieldKind::String { max_len } => match value.as_str() {
            Some(s) => check_string(s, max_len, path, issues),
            None => issues.push(type_mismatch(path, kind.expected(), value)),
        },
        FieldKind::Url { max_len } => match value.as_str() {
            Some(s) => check_url(s, max_len, path, issues),
            None => issues.push(type_mismatch(path, kind.expected(), value)),
        },
        FieldKind::Boolean => {
            if !value.is_bool() {
                issues.push(type_mismatch(path, kind.expected(), value));
            }
        }
        FieldKind::Number => match value {
            Value::Integer(_) => {}
            Value::Float(f) if f.is_nan() => {
                issues.push(FieldIssue::new(path, "Expected number, received nan"))
            }
            Value::Float(_) => {}
            _ => issues.push(type_mismatch(path, kind.expected(), value)),
        },
        FieldKind::StringArray | FieldKind::UrlArray => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = join_path(path, &index.to_string());
                    match item.as_str() {
                        Some(s) if matches!(kind, FieldKind::UrlArray) => {
                            check_url(s, None, &item_path, issues)
                        }
                        Some(_) => {}
                        None => issues.push(type_mismatch(&item_path, "string", item)),
                    }
                }
            }
            None => issues.push(type_mismatch(path, kind.expected(), value)),
        },
        FieldKind::Table(rules) => match value.as_table() {
            Some(nested) => check_table(nested, rules, path, issues),
            None => issues.push(type_mismatch(path, kind.expected(), value)),
        },
    }
}
