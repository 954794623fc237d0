//! Integration tests for flow template deploy payloads

mod common;

use appdeck_extensions::discovery::load_extension;
use appdeck_extensions::{deploy_config, SpecificationRegistry};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{flow_template_toml, AppFixture};

#[tokio::test]
async fn test_deploy_config_encodes_workflow_and_locales() {
    let app = AppFixture::new();
    let config = app.extension("extensions/tagger", &flow_template_toml("Order tagger", "*.flow"));
    app.write("extensions/tagger/tagger.flow", "workflow-bytes");
    app.write("extensions/tagger/locales/en.default.json", "{\"title\":\"Tagger\"}");

    let extension = load_extension(&config, &SpecificationRegistry::builtin()).unwrap();
    let payload = deploy_config(&extension).await.unwrap();

    assert_eq!(payload.handle, "order-tagger");
    assert_eq!(payload.template_handle, "order-tagger");
    assert_eq!(payload.name, "Order tagger");
    assert_eq!(payload.description.as_deref(), Some("Tags new orders"));
    assert_eq!(payload.categories, vec!["orders", "risk"]);
    assert!(!payload.require_app);
    assert!(payload.discoverable);
    assert_eq!(payload.definition, STANDARD.encode("workflow-bytes"));
    assert_eq!(payload.localization.default_locale.as_deref(), Some("en"));

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["localization"]["default_locale"], "en");
}

#[tokio::test]
async fn test_missing_workflow_file() {
    let app = AppFixture::new();
    let config = app.extension("extensions/tagger", &flow_template_toml("Tagger", "missing.flow"));

    let extension = load_extension(&config, &SpecificationRegistry::builtin()).unwrap();
    let err = deploy_config(&extension).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "Missing flow file with the path {}",
            app.path("extensions/tagger/missing.flow")
        )
    );
}

#[tokio::test]
async fn test_without_locales_localization_is_empty() {
    let app = AppFixture::new();
    let config = app.extension("extensions/tagger", &flow_template_toml("Tagger", "main.flow"));
    app.write("extensions/tagger/main.flow", "x");

    let extension = load_extension(&config, &SpecificationRegistry::builtin()).unwrap();
    let payload = deploy_config(&extension).await.unwrap();

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["localization"], serde_json::json!({}));
}
