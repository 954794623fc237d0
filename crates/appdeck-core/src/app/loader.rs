//! Assembles an [`Application`] from an app directory

use super::{AppErrors, Application};
use crate::config::{find_app_directory, load_app_configuration, AppConfiguration};
use crate::dependencies::{get_dependencies, read_package_json, uses_workspaces, PackageManager};
use crate::dotenv::DotEnvFile;
use crate::error::{Error, Result};
use crate::types::{Web, WebConfiguration, WebRole, WEB_CONFIG_FILE};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Environment variable carrying the app's client id
pub const ID_ENVIRONMENT_VARIABLE: &str = "APPDECK_API_KEY";

const DEFAULT_WEB_DIRECTORIES: &[&str] = &["**"];

/// Loads the configuration, web processes and node metadata of an app.
///
/// Extensions are attached afterwards by the extensions crate.
#[derive(Debug, Clone)]
pub struct AppLoader {
    directory: Utf8PathBuf,
    config_name: Option<String>,
}

impl AppLoader {
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            config_name: None,
        }
    }

    /// Select `shop.app.<name>.toml` instead of the default file
    pub fn with_config_name(mut self, name: Option<String>) -> Self {
        self.config_name = name;
        self
    }

    pub async fn load(&self) -> Result<Application> {
        let directory = find_app_directory(&self.directory)?;
        let configuration = load_app_configuration(&directory, self.config_name.as_deref())?;

        let webs = discover_webs(&directory, configuration.web_directories()).await?;
        ensure_unique_roles(&webs)?;

        let package_json = directory.join("package.json");
        let node_dependencies = if package_json.is_file() {
            get_dependencies(&package_json).await?
        } else {
            BTreeMap::new()
        };

        let name = app_name(&directory, &configuration).await?;
        let package_manager = PackageManager::detect(&directory);
        let uses_workspaces = uses_workspaces(&directory).await?;
        let dotenv = DotEnvFile::read_optional(&directory)?;

        debug!(
            "Loaded app {} from {} ({} webs, {} dependencies, {})",
            name,
            directory,
            webs.len(),
            node_dependencies.len(),
            package_manager
        );

        Ok(Application {
            name,
            id_environment_variable_name: ID_ENVIRONMENT_VARIABLE.to_string(),
            directory,
            package_manager,
            configuration,
            node_dependencies,
            webs,
            uses_workspaces,
            dotenv,
            all_extensions: Vec::new(),
            errors: AppErrors::new(),
        })
    }
}

async fn app_name(directory: &Utf8Path, configuration: &AppConfiguration) -> Result<String> {
    if let Some(name) = configuration.name() {
        return Ok(name.to_string());
    }

    let package_json = directory.join("package.json");
    if package_json.is_file() {
        if let Some(name) = read_package_json(&package_json).await?.name {
            return Ok(name);
        }
    }

    Ok(directory.file_name().unwrap_or_default().to_string())
}

fn is_in_node_modules(path: &Utf8Path) -> bool {
    path.components().any(|c| c.as_str() == "node_modules")
}

/// Find every `shop.web.toml` below the web directory globs.
///
/// Without declared directories the whole app tree is searched.
pub async fn discover_webs(directory: &Utf8Path, web_directories: Option<&[String]>) -> Result<Vec<Web>> {
    let patterns: Vec<&str> = match web_directories {
        Some(dirs) => dirs.iter().map(String::as_str).collect(),
        None => DEFAULT_WEB_DIRECTORIES.to_vec(),
    };

    let base = glob::Pattern::escape(directory.as_str());
    let mut files = Vec::new();
    for pattern in patterns {
        let full = format!("{}/{}/{}", base, pattern.trim_end_matches('/'), WEB_CONFIG_FILE);
        for entry in glob::glob(&full)? {
            match entry {
                Ok(path) => match Utf8PathBuf::from_path_buf(path) {
                    Ok(path) if !is_in_node_modules(&path) => files.push(path),
                    Ok(_) => {}
                    Err(path) => warn!("Skipping non UTF-8 path {}", path.display()),
                },
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
    }
    files.sort();
    files.dedup();

    let mut webs = Vec::with_capacity(files.len());
    for file in files {
        let configuration = WebConfiguration::load(&file)?;
        let web_directory = file.parent().map(Utf8Path::to_owned).unwrap_or_default();
        let framework = detect_framework(&web_directory).await?;
        debug!("Found web {} with roles {:?}", web_directory, configuration.roles);
        webs.push(Web {
            directory: web_directory,
            configuration,
            framework,
        });
    }

    Ok(webs)
}

fn ensure_unique_roles(webs: &[Web]) -> Result<()> {
    for role in [WebRole::Frontend, WebRole::Backend] {
        let count = webs.iter().filter(|web| web.configuration.has_role(role)).count();
        if count > 1 {
            return Err(Error::invalid_config(format!(
                "You can only have one web with the `{}` role in your app",
                role
            )));
        }
    }
    Ok(())
}

/// Framework a web process is built with, judged by its manifests
pub async fn detect_framework(web_directory: &Utf8Path) -> Result<Option<String>> {
    const NODE_FRAMEWORKS: [(&str, &str); 3] = [
        ("@remix-run/dev", "remix"),
        ("next", "nextjs"),
        ("express", "express"),
    ];

    let package_json = web_directory.join("package.json");
    if package_json.is_file() {
        let dependencies = get_dependencies(&package_json).await?;
        if let Some((_, framework)) = NODE_FRAMEWORKS
            .iter()
            .find(|(package, _)| dependencies.contains_key(*package))
        {
            return Ok(Some(framework.to_string()));
        }
    }

    if web_directory.join("Gemfile").is_file() {
        return Ok(Some("rails".to_string()));
    }
    if web_directory.join("composer.json").is_file() {
        return Ok(Some("laravel".to_string()));
    }

    Ok(None)
}
