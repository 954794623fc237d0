//! Local storage for appdeck
//!
//! This crate provides the on-disk state the CLI keeps between runs:
//! - **Key-value stores**: one locked JSON file per project
//! - **Session**: the stored session blob
//! - **Timed cache**: fetch-through cache with optional expiry
//! - **App cache**: per-directory info such as the selected configuration

pub mod app_cache;
pub mod local_storage;
pub mod session;

pub use app_cache::{
    app_store, clear_cached_app_info, clear_current_config_file, get_cached_app_info,
    set_cached_app_info, CachedAppInfo,
};
pub use local_storage::{store_directory, LocalStorage, STORE_DIR_ENV};
pub use session::{cache_fetch, cli_store, get_session, remove_session, set_session, CacheValue};
