//! Per-app cached information, keyed by the app directory

use crate::local_storage::LocalStorage;
use anyhow::Result;
use appdeck_core::utils::normalize_directory;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Project name of the per-app store
pub const APP_STORE_PROJECT: &str = "appdeck-app";

/// Information remembered about an app between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAppInfo {
    pub directory: String,

    /// Configuration file selected with `app config use`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_fqdn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_urls: Option<bool>,
}

impl CachedAppInfo {
    pub fn new(directory: &Utf8Path) -> Self {
        Self {
            directory: normalize_directory(directory).to_string(),
            ..Default::default()
        }
    }

    /// Overlay the fields set in `other`
    fn merge(&mut self, other: CachedAppInfo) {
        if other.config_file.is_some() {
            self.config_file = other.config_file;
        }
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.app_id.is_some() {
            self.app_id = other.app_id;
        }
        if other.store_fqdn.is_some() {
            self.store_fqdn = other.store_fqdn;
        }
        if other.update_urls.is_some() {
            self.update_urls = other.update_urls;
        }
    }
}

/// Open the per-app store
pub fn app_store() -> Result<LocalStorage> {
    LocalStorage::open(APP_STORE_PROJECT)
}

fn cache_key(directory: &Utf8Path) -> String {
    normalize_directory(directory).to_string()
}

pub fn get_cached_app_info(store: &LocalStorage, directory: &Utf8Path) -> Result<Option<CachedAppInfo>> {
    store.get(&cache_key(directory))
}

/// Store `info`, keeping previously cached fields that `info` leaves unset
pub fn set_cached_app_info(store: &LocalStorage, info: CachedAppInfo) -> Result<()> {
    let directory = Utf8Path::new(&info.directory).to_owned();
    let key = cache_key(&directory);

    let mut merged = get_cached_app_info(store, &directory)?.unwrap_or_else(|| CachedAppInfo::new(&directory));
    merged.merge(info);
    merged.directory = key.clone();

    debug!("Caching app info for {}", key);
    store.set(&key, &merged)
}

pub fn clear_cached_app_info(store: &LocalStorage, directory: &Utf8Path) -> Result<()> {
    store.delete(&cache_key(directory))
}

/// Forget the configuration selected for `directory`, keeping the rest
pub fn clear_current_config_file(store: &LocalStorage, directory: &Utf8Path) -> Result<()> {
    let Some(mut info) = get_cached_app_info(store, directory)? else {
        return Ok(());
    };
    info.config_file = None;
    store.set(&cache_key(directory), &info)
}
