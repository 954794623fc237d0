//! Session storage and the timed fetch cache

use crate::local_storage::LocalStorage;
use anyhow::Result;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Project name of the CLI-wide store
pub const CLI_STORE_PROJECT: &str = "appdeck-kit";

const SESSION_KEY: &str = "sessionStore";
const CACHE_KEY: &str = "cache";

/// A cached value and the time it was stored, in epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheValue<T> {
    pub value: T,
    pub timestamp: i64,
}

impl<T> CacheValue<T> {
    fn is_fresh(&self, timeout: Option<Duration>, now: i64) -> bool {
        match timeout {
            None => true,
            Some(timeout) => now.saturating_sub(self.timestamp) < timeout.as_millis() as i64,
        }
    }
}

/// Open the CLI-wide store
pub fn cli_store() -> Result<LocalStorage> {
    LocalStorage::open(CLI_STORE_PROJECT)
}

pub fn get_session(store: &LocalStorage) -> Result<Option<String>> {
    debug!("Getting session store...");
    store.get(SESSION_KEY)
}

pub fn set_session(store: &LocalStorage, session: &str) -> Result<()> {
    debug!("Setting session store...");
    store.set(SESSION_KEY, &session)
}

pub fn remove_session(store: &LocalStorage) -> Result<()> {
    debug!("Removing session store...");
    store.delete(SESSION_KEY)
}

/// Return the cached value for `key` while it is younger than `timeout`,
/// otherwise run `fetch`, cache its result and return it.
///
/// Without a timeout a cached value never expires.
pub async fn cache_fetch<T, F, Fut>(
    store: &LocalStorage,
    key: &str,
    fetch: F,
    timeout: Option<Duration>,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let cache: Map<String, Value> = store.get(CACHE_KEY)?.unwrap_or_default();

    if let Some(raw) = cache.get(key) {
        if let Ok(cached) = serde_json::from_value::<CacheValue<T>>(raw.clone()) {
            if cached.is_fresh(timeout, Utc::now().timestamp_millis()) {
                debug!("Cache hit for {}", key);
                return Ok(cached.value);
            }
        }
    }

    debug!("Cache miss for {}", key);
    let value = fetch().await?;
    let entry = CacheValue {
        value,
        timestamp: Utc::now().timestamp_millis(),
    };
    store.merge_entry(CACHE_KEY, key, &entry)?;
    Ok(entry.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> (tempfile::TempDir, LocalStorage) {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, LocalStorage::in_directory(&dir, CLI_STORE_PROJECT))
    }

    #[test]
    fn test_session_round_trip() {
        let (_temp, store) = store();
        assert_eq!(get_session(&store).unwrap(), None);

        set_session(&store, "token").unwrap();
        assert_eq!(get_session(&store).unwrap().as_deref(), Some("token"));

        remove_session(&store).unwrap();
        assert_eq!(get_session(&store).unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_fetch_reuses_fresh_value() {
        let (_temp, store) = store();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let value: String = cache_fetch(
                &store,
                "identity-introspection-url",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("https://example.com/introspect".to_string())
                },
                Some(Duration::from_secs(60)),
            )
            .await
            .unwrap();
            assert_eq!(value, "https://example.com/introspect");
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_fetch_refreshes_expired_value() {
        let (_temp, store) = store();
        let stale = CacheValue {
            value: "old".to_string(),
            timestamp: Utc::now().timestamp_millis() - 10_000,
        };
        let mut cache = Map::new();
        cache.insert("k".to_string(), serde_json::to_value(&stale).unwrap());
        store.set(CACHE_KEY, &cache).unwrap();

        let value: String = cache_fetch(
            &store,
            "k",
            || async { Ok("new".to_string()) },
            Some(Duration::from_secs(1)),
        )
        .await
        .unwrap();
        assert_eq!(value, "new");

        let kept: String = cache_fetch(&store, "k", || async { Ok("unused".to_string()) }, None)
            .await
            .unwrap();
        assert_eq!(kept, "new");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let (_temp, store) = store();
        let result: Result<String> =
            cache_fetch(&store, "k", || async { Err(anyhow::anyhow!("offline")) }, None).await;
        assert!(result.is_err());
        assert!(store.get::<Map<String, Value>>(CACHE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_fetch_keeps_entries_written_while_fetching() {
        let (_temp, store) = store();
        let other = CacheValue {
            value: "theirs".to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };

        let value: String = cache_fetch(
            &store,
            "mine",
            || async {
                store.merge_entry(CACHE_KEY, "other", &other)?;
                Ok::<_, anyhow::Error>("ours".to_string())
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(value, "ours");

        let cache: Map<String, Value> = store.get(CACHE_KEY).unwrap().unwrap();
        assert!(cache.contains_key("mine"));
        assert!(cache.contains_key("other"));
    }
}
