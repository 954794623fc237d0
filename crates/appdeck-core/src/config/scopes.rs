//! Access scope extraction across both configuration dialects

use super::document::AppConfiguration;

/// Raw scope string of a configuration.
///
/// Legacy documents return `scopes` verbatim; current documents return
/// `access_scopes.scopes`, or an empty string when it is absent.
pub fn app_scopes(config: &AppConfiguration) -> &str {
    match config {
        AppConfiguration::Legacy(legacy) => &legacy.scopes,
        AppConfiguration::Current(current) => current
            .access_scopes
            .as_ref()
            .and_then(|access| access.scopes.as_deref())
            .unwrap_or(""),
    }
}

/// Scopes as an ordered list with surrounding whitespace trimmed.
///
/// Empty entries (an empty string, trailing or doubled commas) are dropped,
/// so an empty scope string yields an empty list.
pub fn app_scopes_array(config: &AppConfiguration) -> Vec<String> {
    split_scopes(app_scopes(config))
}

/// Split a comma separated scope string
pub fn split_scopes(scopes: &str) -> Vec<String> {
    scopes
        .split(',')
        .map(str::trim)
        .filter(|scope| !scope.is_empty())
        .map(String::from)
        .collect()
}

/// Join scopes back into the canonical comma separated form
pub fn normalize_scopes<S: AsRef<str>>(scopes: &[S]) -> String {
    scopes
        .iter()
        .map(|scope| scope.as_ref().trim())
        .filter(|scope| !scope.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Legacy documents always use the legacy install flow; current documents
/// only when `access_scopes.use_legacy_install_flow` is explicitly true.
pub fn uses_legacy_scopes_behavior(config: &AppConfiguration) -> bool {
    match config {
        AppConfiguration::Legacy(_) => true,
        AppConfiguration::Current(current) => current
            .access_scopes
            .as_ref()
            .and_then(|access| access.use_legacy_install_flow)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn current(access_scopes: &str) -> AppConfiguration {
        let source = format!(
            r#"
name = "my app"
client_id = "12345"
application_url = "https://example.com"
embedded = true
{}

[webhooks]
api_version = "2023-07"
"#,
            access_scopes
        );
        AppConfiguration::parse(&source, "/app/shop.app.toml").unwrap()
    }

    fn legacy(scopes: &str) -> AppConfiguration {
        AppConfiguration::parse(&format!("scopes = {:?}", scopes), "/app/shop.app.toml").unwrap()
    }

    #[test]
    fn test_current_scopes_are_trimmed_in_order() {
        let config = current("access_scopes = { scopes = \"a, b ,c\" }");
        assert_eq!(app_scopes(&config), "a, b ,c");
        assert_eq!(app_scopes_array(&config), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_absent_access_scopes_yield_empty_list() {
        let config = current("");
        assert_eq!(app_scopes(&config), "");
        assert!(app_scopes_array(&config).is_empty());
    }

    #[test]
    fn test_legacy_scopes_are_returned_verbatim() {
        let config = legacy("read_products,write_orders");
        assert_eq!(app_scopes(&config), "read_products,write_orders");
        assert_eq!(
            app_scopes_array(&config),
            vec!["read_products", "write_orders"]
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("  " ; "blank")]
    #[test_case(" , ," ; "only commas")]
    fn test_empty_scope_strings_never_yield_an_empty_entry(scopes: &str) {
        assert!(app_scopes_array(&legacy(scopes)).is_empty());
    }

    #[test]
    fn test_reformatting_preserves_membership() {
        let messy = legacy(" read_products ,write_orders,, ");
        let normalized = normalize_scopes(&app_scopes_array(&messy));
        assert_eq!(normalized, "read_products,write_orders");
        assert_eq!(split_scopes(&normalized), app_scopes_array(&messy));
    }

    #[test]
    fn test_legacy_documents_use_legacy_behavior() {
        assert!(uses_legacy_scopes_behavior(&legacy("")));
    }

    #[test_case("", false ; "no access scopes")]
    #[test_case("access_scopes = { use_legacy_install_flow = false }", false ; "explicit false")]
    #[test_case("access_scopes = { use_legacy_install_flow = true }", true ; "explicit true")]
    fn test_current_legacy_behavior_flag(access_scopes: &str, expected: bool) {
        assert_eq!(uses_legacy_scopes_behavior(&current(access_scopes)), expected);
    }
}
