//! Integration tests for the default store location

use appdeck_store::{
    app_store, cli_store, get_cached_app_info, get_session, set_cached_app_info, set_session,
    CachedAppInfo, STORE_DIR_ENV,
};
use camino::Utf8PathBuf;
use serial_test::serial;
use tempfile::TempDir;

fn with_store_dir<F: FnOnce(&Utf8PathBuf)>(test: F) {
    let temp = TempDir::new().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    std::env::set_var(STORE_DIR_ENV, dir.as_str());
    test(&dir);
    std::env::remove_var(STORE_DIR_ENV);
}

#[test]
#[serial]
fn test_stores_live_in_override_directory() {
    with_store_dir(|dir| {
        set_session(&cli_store().unwrap(), "session-blob").unwrap();

        assert!(dir.join("appdeck-kit.json").is_file());
        assert_eq!(
            get_session(&cli_store().unwrap()).unwrap().as_deref(),
            Some("session-blob")
        );
    });
}

#[test]
#[serial]
fn test_app_cache_is_separate_from_cli_store() {
    with_store_dir(|dir| {
        let app_dir = dir.join("app");
        std::fs::create_dir_all(&app_dir).unwrap();

        set_cached_app_info(
            &app_store().unwrap(),
            CachedAppInfo {
                config_file: Some("shop.app.toml".to_string()),
                ..CachedAppInfo::new(&app_dir)
            },
        )
        .unwrap();

        assert!(dir.join("appdeck-app.json").is_file());
        assert!(get_session(&cli_store().unwrap()).unwrap().is_none());
        assert_eq!(
            get_cached_app_info(&app_store().unwrap(), &app_dir)
                .unwrap()
                .unwrap()
                .config_file
                .as_deref(),
            Some("shop.app.toml")
        );
    });
}
