//! App info command

use crate::cli::{AppInfoArgs, AppTarget};
use crate::output;
use crate::utils::load_app;
use crate::version::VersionInfo;
use anyhow::Result;
use appdeck_core::config::{app_scopes, BuildConfig};
use appdeck_core::Application;
use appdeck_extensions::SpecificationRegistry;
use appdeck_store::{app_store, get_cached_app_info, CachedAppInfo};
use camino::Utf8Path;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};
use tracing::warn;

/// Packages whose installed versions are reported under tooling
const TOOLING_PACKAGES: &[&str] = &["@appdeck/app", "@appdeck/cli"];

/// Environment variable holding the app's access scopes
const SCOPES_VARIABLE: &str = "SCOPES";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppInfo {
    configuration_file: String,
    app_name: Option<String>,
    client_id: Option<String>,
    access_scopes: String,
    dev_store: Option<String>,
    update_urls: Option<bool>,
    launchable: bool,
    webs: Vec<WebInfo>,
    extensions: Vec<ExtensionGroup>,
    extension_errors: Vec<ExtensionError>,
    tooling: Tooling,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebInfo {
    directory: String,
    roles: Vec<String>,
    framework: Option<String>,
    dev_command: String,
}

#[derive(Tabled)]
struct WebRow {
    directory: String,
    roles: String,
    framework: String,
    command: String,
}

#[derive(Debug, Serialize)]
struct ExtensionGroup {
    specification: String,
    extensions: Vec<ExtensionSummary>,
}

#[derive(Debug, Serialize)]
struct ExtensionSummary {
    handle: String,
    name: String,
    directory: String,
}

#[derive(Debug, Serialize)]
struct ExtensionError {
    title: String,
    path: String,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tooling {
    package_manager: String,
    cli_version: String,
    packages: BTreeMap<String, Option<String>>,
}

fn relative_to<'a>(path: &'a Utf8Path, base: &Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn display_path(path: &Utf8Path, base: &Utf8Path) -> String {
    match relative_to(path, base).as_str() {
        "" => ".".to_string(),
        relative => relative.to_string(),
    }
}

impl AppInfo {
    /// Cached values from earlier sessions win over the configuration file
    fn new(app: &Application, cached: Option<&CachedAppInfo>, registry: &SpecificationRegistry) -> Self {
        let configuration = &app.configuration;
        let build: Option<&BuildConfig> = configuration
            .as_current()
            .and_then(|current| current.build.as_ref());

        let app_name = cached
            .and_then(|info| info.title.clone())
            .or_else(|| configuration.name().map(String::from));
        let client_id = cached
            .and_then(|info| info.app_id.clone())
            .or_else(|| configuration.client_id());
        let dev_store = cached
            .and_then(|info| info.store_fqdn.clone())
            .or_else(|| build.and_then(|b| b.dev_store_url.clone()));
        let update_urls = cached
            .and_then(|info| info.update_urls)
            .or_else(|| build.and_then(|b| b.automatically_update_urls_on_dev));

        let webs = app
            .webs
            .iter()
            .map(|web| WebInfo {
                directory: display_path(&web.directory, &app.directory),
                roles: web.configuration.roles.iter().map(ToString::to_string).collect(),
                framework: web.framework.clone(),
                dev_command: web.configuration.commands.dev.clone(),
            })
            .collect();

        let extensions = registry
            .all()
            .iter()
            .filter_map(|specification| {
                let members = app.extensions_for_type(specification);
                if members.is_empty() {
                    return None;
                }
                Some(ExtensionGroup {
                    specification: specification.external_name.clone(),
                    extensions: members
                        .into_iter()
                        .map(|extension| ExtensionSummary {
                            handle: extension.handle.clone(),
                            name: extension.name.clone(),
                            directory: display_path(&extension.directory, &app.directory),
                        })
                        .collect(),
                })
            })
            .collect();

        let extension_errors = app
            .errors
            .iter()
            .map(|(path, message)| ExtensionError {
                title: error_title(app, path),
                path: display_path(path, &app.directory),
                message: message.to_string(),
            })
            .collect();

        let packages = TOOLING_PACKAGES
            .iter()
            .map(|package| (package.to_string(), app.node_dependencies.get(*package).cloned()))
            .collect();

        Self {
            configuration_file: configuration
                .path()
                .file_name()
                .unwrap_or_default()
                .to_string(),
            app_name,
            client_id,
            access_scopes: app_scopes(configuration).to_string(),
            dev_store,
            update_urls,
            launchable: app.is_launchable(),
            webs,
            extensions,
            extension_errors,
            tooling: Tooling {
                package_manager: app.package_manager.to_string(),
                cli_version: VersionInfo::current().version,
                packages,
            },
        }
    }

    fn print(&self) {
        output::header("Current app configuration");
        output::kv("Configuration file", &self.configuration_file);
        output::kv_opt("App name", self.app_name.as_deref());
        output::kv_opt("Client ID", self.client_id.as_deref());
        output::kv_opt("Access scopes", non_empty(&self.access_scopes));
        output::kv_opt("Dev store", self.dev_store.as_deref());
        output::kv_opt("Update URLs", self.update_urls.map(yes_no));

        output::header("Web processes");
        if self.webs.is_empty() {
            output::info("No web processes found");
        } else {
            let rows: Vec<WebRow> = self
                .webs
                .iter()
                .map(|web| WebRow {
                    directory: web.directory.clone(),
                    roles: web.roles.join(", "),
                    framework: web.framework.clone().unwrap_or_else(|| "-".to_string()),
                    command: web.dev_command.clone(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{}", table);
        }
        output::kv("Launchable", yes_no(self.launchable));

        output::header("Extensions");
        if self.extensions.is_empty() {
            output::info("No extensions found");
        }
        for group in &self.extensions {
            println!("  {}", group.specification);
            for extension in &group.extensions {
                output::kv(&format!("  {}", extension.handle), &extension.directory);
            }
        }

        if !self.extension_errors.is_empty() {
            output::header("Extensions with errors");
            for error in &self.extension_errors {
                output::error(&format!("{} ({})", error.title, error.path));
                for line in error.message.lines() {
                    eprintln!("    {}", line);
                }
            }
        }

        output::header("Tooling and system");
        output::kv("Package manager", &self.tooling.package_manager);
        output::kv("appdeck", &self.tooling.cli_version);
        for (package, version) in &self.tooling.packages {
            output::kv(package, version.as_deref().unwrap_or("Not installed"));
        }
    }
}

/// Handle of the extension an error belongs to, else its directory name
fn error_title(app: &Application, path: &Utf8Path) -> String {
    app.all_extensions
        .iter()
        .find(|extension| extension.config_path.as_path() == path)
        .map(|extension| extension.handle.clone())
        .or_else(|| {
            path.parent()
                .and_then(Utf8Path::file_name)
                .map(String::from)
        })
        .unwrap_or_else(|| path.to_string())
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Environment a web process needs to run against this app
fn web_env(app: &Application, cached: Option<&CachedAppInfo>) -> Vec<(String, String)> {
    let client_id = cached
        .and_then(|info| info.app_id.clone())
        .or_else(|| app.configuration.client_id())
        .unwrap_or_default();

    vec![
        (app.id_environment_variable_name.clone(), client_id),
        (SCOPES_VARIABLE.to_string(), app_scopes(&app.configuration).to_string()),
    ]
}

pub async fn run(args: AppInfoArgs, target: &AppTarget) -> Result<()> {
    let spinner = output::spinner("Loading app...");
    let loaded = load_app(target).await;
    spinner.finish_and_clear();
    let app = loaded?;

    let cached = match app_store().and_then(|store| get_cached_app_info(&store, &app.directory)) {
        Ok(info) => info,
        Err(e) => {
            warn!("Ignoring unreadable app cache: {:#}", e);
            None
        }
    };

    if args.web_env {
        let env = web_env(&app, cached.as_ref());
        if args.json {
            let object: serde_json::Map<String, serde_json::Value> = env
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&object)?);
        } else {
            for (key, value) in env {
                println!("{}={}", key, value);
            }
        }
        return Ok(());
    }

    let info = AppInfo::new(&app, cached.as_ref(), &SpecificationRegistry::builtin());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        info.print();
    }

    Ok(())
}
