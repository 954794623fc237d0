//! End-to-end tests for the appdeck binary

mod common;

use common::{Sandbox, CURRENT_CONFIG};

#[test]
fn test_version_json() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["version", "--json"]);

    assert!(out.success, "{}", out.stderr);
    let json = out.json();
    assert!(semver::Version::parse(json["version"].as_str().unwrap()).is_ok());
}

#[test]
fn test_validate_reports_schema() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", CURRENT_CONFIG);

    let out = sandbox.run(&["app", "config", "validate"]);
    assert!(out.success, "{}", out.stderr);
    assert!(out.stdout.contains("shop.app.toml is a valid current app configuration"));
}

#[test]
fn test_validate_lists_every_issue_and_fails() {
    let sandbox = Sandbox::new();
    sandbox.write(
        "shop.app.toml",
        r#"name = "my app"
client_id = "12345"
application_url = "not a url"
embedded = true
"#,
    );

    let out = sandbox.run(&["app", "config", "validate"]);
    assert!(!out.success);
    assert!(out.stderr.contains("application_url: Invalid url"), "{}", out.stderr);
    assert!(out.stderr.contains("webhooks: Required"), "{}", out.stderr);
}

#[test]
fn test_config_use_is_remembered_until_reset() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", "scopes = \"read_products\"\n");
    sandbox.write("shop.app.staging.toml", CURRENT_CONFIG);

    let used = sandbox.run(&["app", "config", "use", "staging"]);
    assert!(used.success, "{}", used.stderr);

    let shown = sandbox.run(&["app", "config", "show", "--json"]);
    assert!(shown.success, "{}", shown.stderr);
    let json = shown.json();
    assert_eq!(json["schema"], "current");
    assert!(json["path"].as_str().unwrap().ends_with("shop.app.staging.toml"));

    let reset = sandbox.run(&["app", "config", "use", "--reset"]);
    assert!(reset.success, "{}", reset.stderr);

    let json = sandbox.run(&["app", "config", "show", "--json"]).json();
    assert_eq!(json["schema"], "legacy");
    assert_eq!(json["configuration"]["scopes"], "read_products");
}

#[test]
fn test_config_use_rejects_invalid_configuration() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", "scopes = \"\"\n");
    sandbox.write("shop.app.broken.toml", "name = 42\n");

    let out = sandbox.run(&["app", "config", "use", "broken"]);
    assert!(!out.success);

    let json = sandbox.run(&["app", "config", "show", "--json"]).json();
    assert!(json["path"].as_str().unwrap().ends_with("shop.app.toml"));
}

#[test]
fn test_info_json_reports_webs_extensions_and_errors() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", CURRENT_CONFIG);
    sandbox.write(
        "web/shop.web.toml",
        "roles = [\"frontend\", \"backend\"]\n\n[commands]\ndev = \"npm run dev\"\n",
    );
    sandbox.write(
        "extensions/banner/shop.extension.toml",
        "type = \"ui_extension\"\nname = \"Promo banner\"\n",
    );
    sandbox.write(
        "extensions/mystery/shop.extension.toml",
        "type = \"teleporter\"\nname = \"Mystery\"\n",
    );

    let out = sandbox.run(&["app", "info", "--json"]);
    assert!(out.success, "{}", out.stderr);
    let json = out.json();

    assert_eq!(json["appName"], "my app");
    assert_eq!(json["clientId"], "12345");
    assert_eq!(json["launchable"], true);
    assert_eq!(json["webs"][0]["directory"], "web");
    assert_eq!(json["webs"][0]["roles"], serde_json::json!(["frontend", "backend"]));
    assert_eq!(json["extensions"][0]["specification"], "Checkout UI");
    assert_eq!(json["extensions"][0]["extensions"][0]["handle"], "promo-banner");
    assert_eq!(json["extensionErrors"][0]["title"], "mystery");
    assert!(json["extensionErrors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("teleporter"));
}

#[test]
fn test_info_text_marks_missing_values() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", "scopes = \"\"\n");

    let out = sandbox.run(&["app", "info"]);
    assert!(out.success, "{}", out.stderr);
    assert!(out.stdout.contains("Client ID: Not yet configured"), "{}", out.stdout);
    assert!(out.stdout.contains("Dev store: Not yet configured"), "{}", out.stdout);
}

#[test]
fn test_info_web_env() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", CURRENT_CONFIG);

    let out = sandbox.run(&["app", "info", "--web-env"]);
    assert!(out.success, "{}", out.stderr);
    assert!(out.stdout.contains("APPDECK_API_KEY=12345"));
    assert!(out.stdout.contains("SCOPES=read_products,write_orders"));
}

#[test]
fn test_payload() {
    let sandbox = Sandbox::new();
    sandbox.write("shop.app.toml", CURRENT_CONFIG);

    let out = sandbox.run(&["app", "payload", "--org", "42"]);
    assert!(out.success, "{}", out.stderr);
    let json = out.json();

    assert_eq!(json["org"], 42);
    assert_eq!(json["title"], "my app");
    assert_eq!(json["appUrl"], "https://example.com/lala");
    assert_eq!(json["redir"], serde_json::json!(["https://example.com/auth/callback"]));
    assert_eq!(json["type"], "public");
    assert_eq!(
        json["requestedAccessScopes"],
        serde_json::json!(["read_products", "write_orders"])
    );
}

#[test]
fn test_init_writes_a_loadable_project() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_in(
        &sandbox.root,
        &["init", "--name", "Quick Otter", "--template", "none"],
    );
    assert!(out.success, "{}", out.stderr);
    assert!(out.stdout.contains("shopify-app-template-none"));

    let project = sandbox.root.join("quick-otter");
    let validated = sandbox.run_in(&project, &["app", "config", "validate"]);
    assert!(validated.success, "{}", validated.stderr);
    assert!(validated.stdout.contains("legacy"));
}

#[test]
fn test_init_rejects_reserved_name() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_in(&sandbox.root, &["init", "--name", "my appdeck app"]);

    assert!(!out.success);
    assert!(out.stderr.contains("App name can't include the word 'appdeck'"));
}

#[test]
fn test_init_rejects_multiline_template() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_in(
        &sandbox.root,
        &["init", "--name", "Quick Otter", "--template", "https://x.example/t\nclient_id = 5"],
    );

    assert!(!out.success);
    assert!(out.stderr.contains("Invalid url"), "{}", out.stderr);
    assert!(!sandbox.root.join("quick-otter").exists());
}

#[test]
fn test_missing_app_fails_without_panicking() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["app", "info"]);

    assert!(!out.success);
    assert!(!out.stderr.contains("panicked"), "{}", out.stderr);
    assert!(out.stderr.contains("shop.app.toml"), "{}", out.stderr);
}
