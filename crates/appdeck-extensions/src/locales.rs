//! Extension localization files (`locales/*.json`)

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::BTreeMap;

const DEFAULT_MARKER: &str = ".default";

/// Translations keyed by locale, each file base64 encoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,
}

fn locale_files(directory: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let pattern = format!(
        "{}/locales/*.json",
        glob::Pattern::escape(directory.as_str())
    );
    let mut files: Vec<Utf8PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| Utf8PathBuf::from_path_buf(path).ok())
        .collect();
    files.sort();
    Ok(files)
}

/// Read the localization of the extension in `directory`.
///
/// A file named `<locale>.default.json` marks the default locale; exactly
/// one is required once any locale file exists.
pub async fn load_locales_config(directory: &Utf8Path, extension_name: &str) -> Result<LocalesConfig> {
    let files = locale_files(directory)?;
    if files.is_empty() {
        return Ok(LocalesConfig::default());
    }

    let mut defaults = Vec::new();
    let mut translations = BTreeMap::new();
    for file in &files {
        let stem = file.file_stem().unwrap_or_default();
        let locale = match stem.strip_suffix(DEFAULT_MARKER) {
            Some(locale) => {
                defaults.push(locale.to_string());
                locale
            }
            None => stem,
        };
        let content = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file))?;
        translations.insert(locale.to_string(), STANDARD.encode(content));
    }

    match defaults.len() {
        0 => bail!("Missing default language in locales for {}", extension_name),
        1 => Ok(LocalesConfig {
            default_locale: defaults.pop(),
            translations,
        }),
        _ => bail!(
            "Only one default language is allowed in locales for {}",
            extension_name
        ),
    }
}
