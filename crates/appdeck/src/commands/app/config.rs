//! App configuration commands

use crate::cli::{AppTarget, ConfigShowArgs, ConfigUseArgs};
use crate::output;
use crate::utils::{is_interactive, resolve_directory, selected_config_name};
use anyhow::{anyhow, bail, Context, Result};
use appdeck_core::config::{
    available_config_files, config_file_name, find_app_directory, load_app_configuration,
    DEFAULT_CONFIG_FILE,
};
use appdeck_core::{AppConfiguration, Error};
use appdeck_store::{app_store, clear_current_config_file, set_cached_app_info, CachedAppInfo};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

fn app_directory(target: &AppTarget) -> Result<Utf8PathBuf> {
    let start = resolve_directory(target.path.as_deref())?;
    Ok(find_app_directory(&start)?)
}

/// Activate an app configuration for later commands
pub fn use_config(args: ConfigUseArgs, target: &AppTarget) -> Result<()> {
    let directory = app_directory(target)?;
    let store = app_store()?;

    if args.reset {
        clear_current_config_file(&store, &directory)?;
        output::success("Cleared current configuration.");
        output::info(&format!(
            "In order to set a new current configuration, please run `appdeck app config use CONFIG_NAME`, \
             or the default {} is used.",
            DEFAULT_CONFIG_FILE
        ));
        return Ok(());
    }

    let file = match args.name {
        Some(name) => config_file_name(Some(&name))?,
        None => select_config_file(&directory)?,
    };

    // The selection must be a valid document before it is remembered
    let configuration = load_app_configuration(&directory, Some(&file))
        .with_context(|| format!("Could not use {}", file))?;

    set_cached_app_info(
        &store,
        CachedAppInfo {
            config_file: Some(file.clone()),
            ..CachedAppInfo::new(&directory)
        },
    )?;

    output::success(&format!(
        "Using configuration file {} ({} schema)",
        file,
        configuration.kind()
    ));
    Ok(())
}

fn select_config_file(directory: &Utf8Path) -> Result<String> {
    let files = available_config_files(directory)?;
    if files.is_empty() {
        bail!("Could not find any {} file in the directory {}", DEFAULT_CONFIG_FILE, directory);
    }

    if !is_interactive() {
        return Err(anyhow!(
            "No configuration name given. Available configurations: {}",
            files.join(", ")
        ));
    }

    let selection = dialoguer::Select::new()
        .with_prompt("Configuration file")
        .items(&files)
        .default(0)
        .interact()?;

    Ok(files[selection].clone())
}

/// Classify the selected configuration and report every field issue
pub fn validate(target: &AppTarget) -> Result<()> {
    let directory = app_directory(target)?;
    let name = selected_config_name(&directory, target.config.as_deref())?;
    let file = config_file_name(name.as_deref())?;

    match load_app_configuration(&directory, Some(&file)) {
        Ok(configuration) => {
            output::success(&format!(
                "{} is a valid {} app configuration",
                file,
                configuration.kind()
            ));
            if let Some(name) = configuration.name() {
                output::kv("App name", name);
            }
            output::kv_opt("Client ID", configuration.client_id().as_deref());
            Ok(())
        }
        Err(Error::SchemaViolation { issues }) => {
            output::error(&format!("{} matches neither app configuration schema:", file));
            for issue in &issues {
                eprintln!("{}", issue);
            }
            bail!("{} has {} configuration issue(s)", file, issues.len())
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Serialize)]
struct ShownConfiguration<'a> {
    path: &'a Utf8Path,
    schema: String,
    configuration: &'a AppConfiguration,
}

/// Print the classified configuration document
pub fn show(args: ConfigShowArgs, target: &AppTarget) -> Result<()> {
    let directory = app_directory(target)?;
    let name = selected_config_name(&directory, target.config.as_deref())?;
    let configuration = load_app_configuration(&directory, name.as_deref())?;

    if args.json {
        let shown = ShownConfiguration {
            path: configuration.path(),
            schema: configuration.kind().to_string(),
            configuration: &configuration,
        };
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        output::header(&format!("{} ({})", configuration.path(), configuration.kind()));
        println!("{}", configuration.to_toml()?);
    }

    Ok(())
}
