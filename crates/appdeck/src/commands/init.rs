//! Init command: create a new app project

use crate::cli::{AppTarget, InitArgs};
use crate::output;
use crate::utils::{is_interactive, resolve_directory};
use anyhow::{anyhow, bail, Context, Result};
use appdeck_core::config::{validate_url, DEFAULT_CONFIG_FILE};
use appdeck_core::templates::{ConfigTemplateRegistry, StarterConfigContext};
use appdeck_core::utils::slugify;
use camino::Utf8Path;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const MAX_APP_NAME_LENGTH: usize = 30;

/// Word an app name may not contain
const RESERVED_NAME_WORD: &str = "appdeck";

/// A starter repository a new project can be cloned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    /// Hidden templates are accepted by `--template` but not offered in the prompt
    pub visible: bool,
}

pub const TEMPLATES: &[AppTemplate] = &[
    AppTemplate {
        key: "remix",
        label: "Start with Remix (recommended)",
        url: "https://github.com/Shopify/shopify-app-template-remix",
        visible: true,
    },
    AppTemplate {
        key: "none",
        label: "Start by adding your first extension",
        url: "https://github.com/Shopify/shopify-app-template-none",
        visible: true,
    },
    AppTemplate {
        key: "node",
        label: "Start with Node",
        url: "https://github.com/Shopify/shopify-app-template-node",
        visible: false,
    },
    AppTemplate {
        key: "php",
        label: "Start with PHP",
        url: "https://github.com/Shopify/shopify-app-template-php",
        visible: false,
    },
    AppTemplate {
        key: "ruby",
        label: "Start with Ruby",
        url: "https://github.com/Shopify/shopify-app-template-ruby",
        visible: false,
    },
];

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "clever", "crisp", "eager", "fancy", "gentle", "golden", "happy",
    "jolly", "lively", "lucky", "mellow", "nimble", "proud", "quick", "quiet", "rapid", "shiny",
    "silent", "sunny", "swift", "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "anchor", "badger", "beacon", "canyon", "comet", "falcon", "forest", "harbor", "lantern",
    "meadow", "otter", "pebble", "pine", "river", "rocket", "summit", "thistle", "tiger", "valley",
    "willow",
];

const MAX_NAME_ATTEMPTS: usize = 20;

/// Check a project name, returning the message shown to the user
pub fn validate_app_name(name: &str) -> std::result::Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("App name can't be empty".to_string());
    }
    if name.chars().count() > MAX_APP_NAME_LENGTH {
        return Err(format!(
            "Enter a shorter name ({} character max.)",
            MAX_APP_NAME_LENGTH
        ));
    }
    if name.to_lowercase().contains(RESERVED_NAME_WORD) {
        return Err(format!("App name can't include the word '{}'", RESERVED_NAME_WORD));
    }
    Ok(())
}

/// Repository URL for a template key; anything else must be a valid custom URL
pub fn template_url(template: &str) -> Result<String> {
    let template = template.trim();
    if let Some(known) = TEMPLATES.iter().find(|t| t.key.eq_ignore_ascii_case(template)) {
        return Ok(known.url.to_string());
    }

    validate_url(template)
        .map_err(|message| anyhow!("Template {:?} is not a known template: {}", template, message))?;
    Ok(template.to_string())
}

/// `<adjective>-<noun>-app`, avoiding names for which `taken` is true.
///
/// Falls back to a numbered name and returns the last one tried when every
/// attempt is taken; `run` then refuses the existing directory.
pub fn generate_app_name<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut candidate = String::new();
    for _ in 0..MAX_NAME_ATTEMPTS {
        let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("new");
        let noun = NOUNS.choose(rng).copied().unwrap_or("project");
        candidate = format!("{}-{}-app", adjective, noun);
        if !taken(&candidate) {
            return candidate;
        }
    }

    let mut numbered = candidate.clone();
    for _ in 0..MAX_NAME_ATTEMPTS {
        numbered = format!("{}-{}", candidate, rng.gen_range(1000..10000));
        if !taken(&numbered) {
            break;
        }
    }
    numbered
}

fn prompt_name(parent: &Utf8Path) -> Result<String> {
    let default_name = generate_app_name(&mut rand::thread_rng(), |name| parent.join(name).exists());

    if !is_interactive() {
        output::info(&format!("No name given, using {}", default_name));
        return Ok(default_name);
    }

    let name: String = dialoguer::Input::new()
        .with_prompt("Your project name?")
        .default(default_name)
        .validate_with(|input: &String| validate_app_name(input))
        .interact_text()?;
    Ok(name)
}

fn prompt_template() -> Result<String> {
    let visible: Vec<&AppTemplate> = TEMPLATES.iter().filter(|t| t.visible).collect();

    if !is_interactive() {
        return visible
            .first()
            .map(|t| t.url.to_string())
            .ok_or_else(|| anyhow!("No templates available"));
    }

    let labels: Vec<&str> = visible.iter().map(|t| t.label).collect();
    let selection = dialoguer::Select::new()
        .with_prompt("Get started building your app")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(visible[selection].url.to_string())
}

pub async fn run(args: InitArgs, target: AppTarget) -> Result<()> {
    let parent = resolve_directory(target.path.as_deref())?;

    let name = match args.name {
        Some(name) => {
            validate_app_name(&name).map_err(|message| anyhow!(message))?;
            name.trim().to_string()
        }
        None => prompt_name(&parent)?,
    };

    let url = match args.template {
        Some(template) => template_url(&template)?,
        None => prompt_template()?,
    };

    let project_dir = parent.join(slugify(&name));
    if project_dir.exists() {
        bail!("Directory {} already exists. Choose a different name.", project_dir);
    }

    let spinner = output::spinner(&format!("Creating {}...", name));
    let content = ConfigTemplateRegistry::new()
        .and_then(|registry| registry.render_starter_config(&StarterConfigContext::new(&name, &url)));
    let written = content.map_err(anyhow::Error::from).and_then(|content| {
        std::fs::create_dir_all(&project_dir)
            .with_context(|| format!("Failed to create {}", project_dir))?;
        std::fs::write(project_dir.join(DEFAULT_CONFIG_FILE), content)
            .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))
    });
    spinner.finish_and_clear();
    written?;

    debug!("Initialized {} in {}", name, project_dir);
    output::success(&format!("{} is ready for you to build!", name));
    output::kv("Directory", project_dir.as_str());
    output::kv("Template", &url);
    output::info(&format!("Clone the template into {} to get started", project_dir));

    Ok(())
}
